//! Capability traits for graph algorithms.
//!
//! Traversals and the dominator analysis are written against these traits
//! rather than a concrete graph, so they run unchanged on the raw
//! [`DirectedGraph`](crate::utils::graph::DirectedGraph) and on the
//! flowchart-level [`FlowCfg`](crate::analysis::FlowCfg).
//!
//! - [`GraphBase`] - node count and node iteration
//! - [`Successors`] - outgoing adjacency
//! - [`Predecessors`] - incoming adjacency
//! - [`RootedGraph`] - a designated entry node

use crate::utils::graph::NodeId;

/// Core properties every graph exposes.
pub trait GraphBase {
    /// Returns the number of nodes. Node ids are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Iterates over all node ids in ascending order.
    fn node_ids(&self) -> impl Iterator<Item = NodeId>;
}

/// Forward traversal.
pub trait Successors: GraphBase {
    /// Iterates over the direct successors of `node`, in edge insertion order.
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// Backward traversal.
pub trait Predecessors: GraphBase {
    /// Iterates over the direct predecessors of `node`, in edge insertion order.
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId>;
}

/// A graph with a single entry node, as required by dominance.
pub trait RootedGraph: Successors + Predecessors {
    /// The node every execution starts from.
    fn entry(&self) -> NodeId;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal adjacency-list graph for exercising trait-generic algorithms.
    pub struct TestGraph {
        pub succ: Vec<Vec<usize>>,
        pub pred: Vec<Vec<usize>>,
        pub entry: usize,
    }

    impl TestGraph {
        pub fn new(nodes: usize, edges: &[(usize, usize)]) -> Self {
            let mut succ = vec![Vec::new(); nodes];
            let mut pred = vec![Vec::new(); nodes];
            for &(from, to) in edges {
                succ[from].push(to);
                pred[to].push(from);
            }
            Self {
                succ,
                pred,
                entry: 0,
            }
        }
    }

    impl GraphBase for TestGraph {
        fn node_count(&self) -> usize {
            self.succ.len()
        }

        fn node_ids(&self) -> impl Iterator<Item = NodeId> {
            (0..self.succ.len()).map(NodeId::new)
        }
    }

    impl Successors for TestGraph {
        fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.succ[node.index()].iter().copied().map(NodeId::new)
        }
    }

    impl Predecessors for TestGraph {
        fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
            self.pred[node.index()].iter().copied().map(NodeId::new)
        }
    }

    impl RootedGraph for TestGraph {
        fn entry(&self) -> NodeId {
            NodeId::new(self.entry)
        }
    }

    #[test]
    fn test_graph_adjacency() {
        let graph = TestGraph::new(3, &[(0, 1), (0, 2), (1, 2)]);
        assert_eq!(graph.node_count(), 3);
        let succ: Vec<_> = graph.successors(NodeId::new(0)).collect();
        assert_eq!(succ, vec![NodeId::new(1), NodeId::new(2)]);
        let pred: Vec<_> = graph.predecessors(NodeId::new(2)).collect();
        assert_eq!(pred, vec![NodeId::new(0), NodeId::new(1)]);
        assert_eq!(graph.entry(), NodeId::new(0));
    }
}
