//! Flowchart nodes.

use serde::{Deserialize, Serialize};

use crate::expression::{Expression, Variable};

/// The kind of a node together with its payload.
///
/// Serialized internally tagged by `"kind"`, flattened into the node
/// object. Any kind this crate does not know deserializes as
/// [`NodeKind::Unknown`], which the code generator reports as unsupported
/// instead of failing the whole diagram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    /// Unique entry of the diagram.
    Start,
    /// Terminates a path.
    End,
    /// Declares variables. Declarations produce no statements.
    DeclareVariable {
        /// The declared variables
        #[serde(default)]
        variables: Vec<Variable>,
    },
    /// Assigns a value to a variable or array element.
    AssignVariable {
        /// An assignment expression
        expression: Expression,
    },
    /// Reads a value into a variable.
    Input {
        /// The receiving variable, possibly indexed
        variable: Variable,
    },
    /// Prints a value.
    Output {
        /// A value expression
        expression: Expression,
    },
    /// Two-way branch on a condition.
    Conditional {
        /// A condition expression
        expression: Expression,
    },
    /// Any kind not recognized by this crate.
    #[serde(other)]
    Unknown,
}

impl NodeKind {
    /// Returns the kind name, as used in the serialized form.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::End => "end",
            NodeKind::DeclareVariable { .. } => "declareVariable",
            NodeKind::AssignVariable { .. } => "assignVariable",
            NodeKind::Input { .. } => "input",
            NodeKind::Output { .. } => "output",
            NodeKind::Conditional { .. } => "conditional",
            NodeKind::Unknown => "unknown",
        }
    }

    /// Returns `true` for nodes that fall through to a single successor and
    /// produce at most one statement.
    #[must_use]
    pub fn is_straight_line(&self) -> bool {
        matches!(
            self,
            NodeKind::DeclareVariable { .. }
                | NodeKind::AssignVariable { .. }
                | NodeKind::Input { .. }
                | NodeKind::Output { .. }
        )
    }
}

/// A node of the flowchart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    /// Unique id within the diagram.
    pub id: String,
    /// Optional display label shown in the editor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Kind and payload.
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl FlowNode {
    /// Creates a node without label.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        FlowNode {
            id: id.into(),
            label: None,
            kind,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns the display label, falling back to the kind name.
    #[must_use]
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or_else(|| self.kind.name())
    }
}
