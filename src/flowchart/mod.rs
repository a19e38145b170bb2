//! The flowchart model consumed from the diagram editor.
//!
//! A [`Diagram`] is a list of [`FlowNode`]s and a list of [`FlowEdge`]s that
//! reference nodes by id. It is plain data: nothing here checks that ids are
//! unique or that a start node exists. [`FlowCfg::build`](crate::analysis::FlowCfg::build)
//! does that when the diagram is analyzed.
//!
//! # Serialized Form
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": "s", "kind": "start" },
//!     { "id": "o", "kind": "output",
//!       "expression": { "rightSide": [ { "type": "literal", "value": "\"hi\"" } ] } },
//!     { "id": "e", "kind": "end" }
//!   ],
//!   "edges": [
//!     { "source": "s", "target": "o" },
//!     { "source": "o", "target": "e" }
//!   ]
//! }
//! ```

mod builder;
mod edge;
mod node;

use serde::{Deserialize, Serialize};

use crate::Result;

pub use builder::DiagramBuilder;
pub use edge::{BranchLabel, FlowEdge};
pub use node::{FlowNode, NodeKind};

/// A complete flowchart: nodes plus the edges between them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagram {
    /// All nodes, in editor order.
    #[serde(default)]
    pub nodes: Vec<FlowNode>,
    /// All edges, in editor order.
    #[serde(default)]
    pub edges: Vec<FlowEdge>,
}

impl Diagram {
    /// Parses a diagram from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if the text is not a valid diagram.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes the diagram to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the node with the given id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&FlowNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}
