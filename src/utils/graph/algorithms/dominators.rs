//! Dominator sets via iterative data-flow analysis.
//!
//! A node `d` **dominates** `n` if every path from the entry to `n` passes
//! through `d`. Flowcharts are small, so instead of building a dominator tree
//! with Lengauer-Tarjan this module computes the full set `dom(n)` for every
//! node as the greatest fixed point of
//!
//! ```text
//! dom(entry) = {entry}
//! dom(n)     = {n} ∪ ⋂ dom(p) for p in preds(n)
//! ```
//!
//! Non-entry nodes start at "all nodes" and are recomputed in reverse
//! postorder until no set changes. The result answers `dominates(a, b)` with
//! a single bit test.
//!
//! Nodes unreachable from the entry never take part in the iteration and keep
//! the full set, so every node vacuously dominates them. Callers that care
//! must check [`DominatorSets::is_reachable`] first.

use crate::utils::{
    graph::{algorithms::traversal::reverse_postorder, NodeId, RootedGraph},
    BitSet,
};

/// Per-node dominator sets of a rooted graph.
#[derive(Debug, Clone)]
pub struct DominatorSets {
    entry: NodeId,
    sets: Vec<BitSet>,
    reachable: BitSet,
    iterations: usize,
}

impl DominatorSets {
    /// Returns the entry node the sets were computed from.
    #[inline]
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Returns `true` if `a` dominates `b`. Every node dominates itself.
    ///
    /// Out-of-range nodes dominate nothing and are dominated by nothing.
    #[must_use]
    pub fn dominates(&self, a: NodeId, b: NodeId) -> bool {
        self.sets
            .get(b.index())
            .is_some_and(|set| set.contains(a.index()))
    }

    /// Returns `true` if `a` dominates `b` and `a != b`.
    #[must_use]
    pub fn strictly_dominates(&self, a: NodeId, b: NodeId) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns `true` if `node` is reachable from the entry.
    #[must_use]
    pub fn is_reachable(&self, node: NodeId) -> bool {
        self.reachable.contains(node.index())
    }

    /// Returns the raw dominator set of `node`.
    #[must_use]
    pub fn dominator_set(&self, node: NodeId) -> Option<&BitSet> {
        self.sets.get(node.index())
    }

    /// Returns the dominators of `node` in ascending id order.
    pub fn dominators_of(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.sets
            .get(node.index())
            .into_iter()
            .flat_map(BitSet::iter)
            .map(NodeId::new)
    }

    /// Returns the closest strict dominator of `node`.
    ///
    /// Dominators of a reachable node form a chain, so the immediate
    /// dominator is the strict dominator whose own set is exactly one
    /// smaller. Returns `None` for the entry and for unreachable nodes.
    #[must_use]
    pub fn immediate_dominator(&self, node: NodeId) -> Option<NodeId> {
        if node == self.entry || !self.is_reachable(node) {
            return None;
        }
        let depth = self.sets[node.index()].count();
        self.dominators_of(node)
            .filter(|&d| d != node)
            .find(|d| self.sets[d.index()].count() + 1 == depth)
    }

    /// Returns how many sweeps the fixed point needed, the last one being the
    /// sweep that observed no change.
    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

/// Computes dominator sets for every node of `graph`.
///
/// # Examples
///
/// ```rust,ignore
/// use flowscope::utils::graph::algorithms::compute_dominators;
///
/// let doms = compute_dominators(&cfg);
/// assert!(doms.dominates(cfg.entry(), loop_header));
/// ```
pub fn compute_dominators<G: RootedGraph>(graph: &G) -> DominatorSets {
    let node_count = graph.node_count();
    let entry = graph.entry();

    let mut sets = vec![BitSet::full(node_count); node_count];
    let mut reachable = BitSet::new(node_count);
    if entry.index() >= node_count {
        return DominatorSets {
            entry,
            sets,
            reachable,
            iterations: 0,
        };
    }

    let order = reverse_postorder(graph, entry);
    for node in &order {
        reachable.insert(node.index());
    }

    let mut entry_set = BitSet::new(node_count);
    entry_set.insert(entry.index());
    sets[entry.index()] = entry_set;

    let mut iterations = 0;
    let mut changed = true;
    while changed {
        changed = false;
        iterations += 1;

        for &node in order.iter().filter(|&&n| n != entry) {
            let mut next = BitSet::full(node_count);
            for pred in graph.predecessors(node) {
                if reachable.contains(pred.index()) {
                    next.intersect_with(&sets[pred.index()]);
                }
            }
            next.insert(node.index());

            if next != sets[node.index()] {
                sets[node.index()] = next;
                changed = true;
            }
        }
    }

    DominatorSets {
        entry,
        sets,
        reachable,
        iterations,
    }
}
