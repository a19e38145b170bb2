//! Flowchart edges.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Which branch of a conditional an edge represents.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BranchLabel {
    /// Taken when the condition holds.
    Yes,
    /// Taken when the condition does not hold.
    No,
}

impl BranchLabel {
    /// Returns the label of the other branch.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            BranchLabel::Yes => BranchLabel::No,
            BranchLabel::No => BranchLabel::Yes,
        }
    }
}

/// A directed edge between two nodes, referenced by id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Branch label, present on edges leaving a conditional.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<BranchLabel>,
}

impl FlowEdge {
    /// Creates an unlabeled edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        FlowEdge {
            source: source.into(),
            target: target.into(),
            label: None,
        }
    }

    /// Creates a labeled conditional edge.
    pub fn branch(source: impl Into<String>, target: impl Into<String>, label: BranchLabel) -> Self {
        FlowEdge {
            label: Some(label),
            ..FlowEdge::new(source, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_json() {
        let edge = FlowEdge::branch("c", "body", BranchLabel::Yes);
        assert_eq!(
            serde_json::to_string(&edge).unwrap(),
            r#"{"source":"c","target":"body","label":"yes"}"#
        );
        let plain: FlowEdge = serde_json::from_str(r#"{"source":"a","target":"b"}"#).unwrap();
        assert_eq!(plain, FlowEdge::new("a", "b"));
    }

    #[test]
    fn test_opposite() {
        assert_eq!(BranchLabel::Yes.opposite(), BranchLabel::No);
        assert_eq!(BranchLabel::No.to_string(), "no");
    }
}
