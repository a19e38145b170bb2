//! Edge kinds of the flowchart CFG.

use std::fmt;

use crate::flowchart::BranchLabel;

/// How control moves along a CFG edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfgEdgeKind {
    /// Fall-through from a non-branching node.
    Unconditional,
    /// The "yes" branch of a conditional.
    Yes,
    /// The "no" branch of a conditional.
    No,
}

impl CfgEdgeKind {
    /// Maps an optional diagram edge label to an edge kind.
    #[must_use]
    pub const fn from_label(label: Option<BranchLabel>) -> Self {
        match label {
            Some(BranchLabel::Yes) => CfgEdgeKind::Yes,
            Some(BranchLabel::No) => CfgEdgeKind::No,
            None => CfgEdgeKind::Unconditional,
        }
    }

    /// Returns the branch label, or `None` for fall-through edges.
    #[must_use]
    pub const fn label(self) -> Option<BranchLabel> {
        match self {
            CfgEdgeKind::Yes => Some(BranchLabel::Yes),
            CfgEdgeKind::No => Some(BranchLabel::No),
            CfgEdgeKind::Unconditional => None,
        }
    }

    /// Returns `true` for branch edges.
    #[must_use]
    pub const fn is_conditional(self) -> bool {
        matches!(self, CfgEdgeKind::Yes | CfgEdgeKind::No)
    }
}

impl fmt::Display for CfgEdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CfgEdgeKind::Unconditional => "next",
            CfgEdgeKind::Yes => "yes",
            CfgEdgeKind::No => "no",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(CfgEdgeKind::from_label(Some(BranchLabel::Yes)), CfgEdgeKind::Yes);
        assert_eq!(CfgEdgeKind::from_label(None), CfgEdgeKind::Unconditional);
        assert_eq!(CfgEdgeKind::No.label(), Some(BranchLabel::No));
        assert!(CfgEdgeKind::No.is_conditional());
        assert!(!CfgEdgeKind::Unconditional.is_conditional());
        assert_eq!(CfgEdgeKind::Unconditional.to_string(), "next");
    }
}
