//! Graph traversal orders.
//!
//! - [`bfs`] - breadth-first iterator
//! - [`bfs_distances`] - breadth-first distances restricted to a node filter
//! - [`postorder`] / [`reverse_postorder`] - depth-first orders used by the
//!   dominator fixed point
//! - [`reachable`] - set of nodes reachable from a start node
//!
//! All functions tolerate an out-of-range start node and return an empty
//! result for it.

use std::collections::VecDeque;

use crate::utils::{
    graph::{NodeId, Successors},
    BitSet,
};

/// Breadth-first iterator over nodes reachable from a start node.
pub struct BfsIterator<'g, G: Successors> {
    graph: &'g G,
    queue: VecDeque<NodeId>,
    seen: BitSet,
}

impl<G: Successors> Iterator for BfsIterator<'_, G> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        for succ in self.graph.successors(node) {
            if self.seen.insert(succ.index()) {
                self.queue.push_back(succ);
            }
        }
        Some(node)
    }
}

/// Visits every node reachable from `start` in breadth-first order.
pub fn bfs<G: Successors>(graph: &G, start: NodeId) -> BfsIterator<'_, G> {
    let mut seen = BitSet::new(graph.node_count());
    let mut queue = VecDeque::new();
    if start.index() < graph.node_count() {
        seen.insert(start.index());
        queue.push_back(start);
    }
    BfsIterator { graph, queue, seen }
}

/// Computes shortest edge distances from `start` to every node `allow` accepts.
///
/// Nodes rejected by `allow` are neither returned nor expanded, which lets a
/// caller confine the search to one loop body. `start` itself is always
/// reported at distance zero. Results are in discovery order.
pub fn bfs_distances<G, F>(graph: &G, start: NodeId, allow: F) -> Vec<(NodeId, usize)>
where
    G: Successors,
    F: Fn(NodeId) -> bool,
{
    if start.index() >= graph.node_count() {
        return Vec::new();
    }

    let mut seen = BitSet::new(graph.node_count());
    seen.insert(start.index());
    let mut queue = VecDeque::from([(start, 0)]);
    let mut result = Vec::new();

    while let Some((node, distance)) = queue.pop_front() {
        result.push((node, distance));
        for succ in graph.successors(node) {
            if allow(succ) && seen.insert(succ.index()) {
                queue.push_back((succ, distance + 1));
            }
        }
    }
    result
}

/// Returns the depth-first postorder of nodes reachable from `start`.
#[allow(clippy::items_after_statements)]
pub fn postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let node_count = graph.node_count();
    if start.index() >= node_count {
        return Vec::new();
    }

    #[derive(Clone, Copy)]
    enum State {
        Enter,
        Exit,
    }

    let mut visited = BitSet::new(node_count);
    let mut result = Vec::with_capacity(node_count);
    let mut stack = vec![(start, State::Enter)];

    while let Some((node, state)) = stack.pop() {
        match state {
            State::Enter => {
                if !visited.insert(node.index()) {
                    continue;
                }
                stack.push((node, State::Exit));
                let successors: Vec<NodeId> = graph.successors(node).collect();
                for &succ in successors.iter().rev() {
                    if !visited.contains(succ.index()) {
                        stack.push((succ, State::Enter));
                    }
                }
            }
            State::Exit => result.push(node),
        }
    }

    result
}

/// Returns the reverse postorder of nodes reachable from `start`.
///
/// Every node appears before its successors except along back edges, the
/// order in which forward data-flow problems converge fastest.
pub fn reverse_postorder<G: Successors>(graph: &G, start: NodeId) -> Vec<NodeId> {
    let mut order = postorder(graph, start);
    order.reverse();
    order
}

/// Returns the set of node indices reachable from `start`, `start` included.
pub fn reachable<G: Successors>(graph: &G, start: NodeId) -> BitSet {
    let mut set = BitSet::new(graph.node_count());
    for node in bfs(graph, start) {
        set.insert(node.index());
    }
    set
}
