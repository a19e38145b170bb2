//! Node identifiers.

use std::fmt;

/// Dense index of a node inside a [`DirectedGraph`](crate::utils::graph::DirectedGraph).
///
/// Ids are handed out sequentially from zero by
/// [`DirectedGraph::add_node`](crate::utils::graph::DirectedGraph::add_node),
/// which lets analyses key per-node data by a plain `Vec` or
/// [`BitSet`](crate::utils::BitSet) instead of a hash map. A flowchart's own
/// string ids are mapped onto these by
/// [`FlowCfg`](crate::analysis::FlowCfg).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Wraps a raw index. Mostly useful in tests; graphs hand out ids themselves.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw index, suitable for indexing per-node vectors.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl From<usize> for NodeId {
    #[inline]
    fn from(index: usize) -> Self {
        NodeId(index)
    }
}

impl From<NodeId> for usize {
    #[inline]
    fn from(node: NodeId) -> Self {
        node.0
    }
}
