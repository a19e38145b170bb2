//! Adjacency-list directed graph.
//!
//! [`DirectedGraph`] owns its node payloads in a `Vec` and stores edges in a
//! second `Vec`, with per-node outgoing/incoming lists of [`EdgeId`]s. Both
//! node and edge ids are dense, so per-node analysis results can live in
//! plain vectors indexed by [`NodeId::index`].

use crate::{
    utils::graph::{
        edge::EdgeId,
        node::NodeId,
        traits::{GraphBase, Predecessors, Successors},
    },
    Error, Result,
};

#[derive(Debug, Clone)]
struct EdgeData<E> {
    source: NodeId,
    target: NodeId,
    data: E,
}

/// A directed multigraph with typed node (`N`) and edge (`E`) payloads.
///
/// Parallel edges and self loops are allowed; a flowchart conditional whose
/// "yes" branch points back at itself is a self loop.
///
/// # Examples
///
/// ```rust
/// use flowscope::utils::graph::DirectedGraph;
///
/// let mut graph: DirectedGraph<&str, ()> = DirectedGraph::new();
/// let start = graph.add_node("start");
/// let end = graph.add_node("end");
/// graph.add_edge(start, end, ())?;
///
/// assert_eq!(graph.successors(start).collect::<Vec<_>>(), vec![end]);
/// assert_eq!(graph.exit_nodes().collect::<Vec<_>>(), vec![end]);
/// # Ok::<(), flowscope::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N, E> {
    nodes: Vec<N>,
    edges: Vec<EdgeData<E>>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
}

impl<N, E> Default for DirectedGraph<N, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> DirectedGraph<N, E> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        DirectedGraph {
            nodes: Vec::new(),
            edges: Vec::new(),
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Creates an empty graph with room for the given number of nodes and edges.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        DirectedGraph {
            nodes: Vec::with_capacity(node_capacity),
            edges: Vec::with_capacity(edge_capacity),
            outgoing: Vec::with_capacity(node_capacity),
            incoming: Vec::with_capacity(node_capacity),
        }
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, data: N) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(data);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Returns the payload of `node`, if it exists.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&N> {
        self.nodes.get(node.index())
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all node ids in ascending order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Iterates over `(id, payload)` pairs in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, data)| (NodeId::new(i), data))
    }

    /// Adds an edge from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GraphError`] if either endpoint does not exist.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, data: E) -> Result<EdgeId> {
        for (role, node) in [("source", source), ("target", target)] {
            if node.index() >= self.nodes.len() {
                return Err(Error::GraphError(format!(
                    "{role} node {node} does not exist in graph with {} nodes",
                    self.nodes.len()
                )));
            }
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(EdgeData {
            source,
            target,
            data,
        });
        self.outgoing[source.index()].push(id);
        self.incoming[target.index()].push(id);
        Ok(id)
    }

    /// Returns the payload of `edge`, if it exists.
    #[must_use]
    pub fn edge(&self, edge: EdgeId) -> Option<&E> {
        self.edges.get(edge.index()).map(|e| &e.data)
    }

    /// Returns the `(source, target)` pair of `edge`, if it exists.
    #[must_use]
    pub fn edge_endpoints(&self, edge: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edges.get(edge.index()).map(|e| (e.source, e.target))
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over the successors of `node` in edge insertion order.
    ///
    /// A node reached through two parallel edges is yielded twice.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency(&self.outgoing, node)
            .iter()
            .map(|&edge| self.edges[edge.index()].target)
    }

    /// Iterates over the predecessors of `node` in edge insertion order.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacency(&self.incoming, node)
            .iter()
            .map(|&edge| self.edges[edge.index()].source)
    }

    /// Iterates over `(edge id, target, payload)` for each outgoing edge of `node`.
    pub fn outgoing_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, NodeId, &E)> + '_ {
        self.adjacency(&self.outgoing, node).iter().map(|&edge| {
            let data = &self.edges[edge.index()];
            (edge, data.target, &data.data)
        })
    }

    /// Returns the number of outgoing edges of `node`.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.adjacency(&self.outgoing, node).len()
    }

    /// Returns the number of incoming edges of `node`.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.adjacency(&self.incoming, node).len()
    }

    /// Iterates over nodes without incoming edges.
    pub fn entry_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|&n| self.in_degree(n) == 0)
    }

    /// Iterates over nodes without outgoing edges.
    pub fn exit_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.node_ids().filter(|&n| self.out_degree(n) == 0)
    }

    fn adjacency<'g>(&self, lists: &'g [Vec<EdgeId>], node: NodeId) -> &'g [EdgeId] {
        lists.get(node.index()).map_or(&[], Vec::as_slice)
    }
}

impl<N, E> GraphBase for DirectedGraph<N, E> {
    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }
}

impl<N, E> Successors for DirectedGraph<N, E> {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        DirectedGraph::successors(self, node)
    }
}

impl<N, E> Predecessors for DirectedGraph<N, E> {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        DirectedGraph::predecessors(self, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> (DirectedGraph<&'static str, char>, [NodeId; 4]) {
        let mut graph = DirectedGraph::new();
        let a = graph.add_node("a");
        let b = graph.add_node("b");
        let c = graph.add_node("c");
        let d = graph.add_node("d");
        graph.add_edge(a, b, 'y').unwrap();
        graph.add_edge(a, c, 'n').unwrap();
        graph.add_edge(b, d, '-').unwrap();
        graph.add_edge(c, d, '-').unwrap();
        (graph, [a, b, c, d])
    }

    #[test]
    fn test_add_nodes_and_edges() {
        let (graph, [a, b, c, d]) = diamond();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.node(b), Some(&"b"));
        assert_eq!(graph.successors(a).collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(graph.predecessors(d).collect::<Vec<_>>(), vec![b, c]);
        assert_eq!(graph.in_degree(d), 2);
        assert_eq!(graph.out_degree(d), 0);
    }

    #[test]
    fn test_edge_payloads_keep_insertion_order() {
        let (graph, [a, b, c, _]) = diamond();
        let labels: Vec<_> = graph
            .outgoing_edges(a)
            .map(|(_, target, label)| (target, *label))
            .collect();
        assert_eq!(labels, vec![(b, 'y'), (c, 'n')]);
        assert_eq!(graph.edge_endpoints(EdgeId::new(0)), Some((a, b)));
        assert_eq!(graph.edge(EdgeId::new(9)), None);
    }

    #[test]
    fn test_add_edge_rejects_missing_endpoint() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        let result = graph.add_edge(a, NodeId::new(5), ());
        assert!(matches!(result, Err(Error::GraphError(_))));
    }

    #[test]
    fn test_entry_and_exit_nodes() {
        let (graph, [a, _, _, d]) = diamond();
        assert_eq!(graph.entry_nodes().collect::<Vec<_>>(), vec![a]);
        assert_eq!(graph.exit_nodes().collect::<Vec<_>>(), vec![d]);
    }

    #[test]
    fn test_self_loop() {
        let mut graph: DirectedGraph<(), ()> = DirectedGraph::new();
        let a = graph.add_node(());
        graph.add_edge(a, a, ()).unwrap();
        assert_eq!(graph.successors(a).collect::<Vec<_>>(), vec![a]);
        assert_eq!(graph.predecessors(a).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_unknown_node_queries_are_empty() {
        let graph: DirectedGraph<(), ()> = DirectedGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.successors(NodeId::new(3)).count(), 0);
        assert_eq!(graph.out_degree(NodeId::new(3)), 0);
    }
}
