//! Natural loop detection over flowchart control flow.
//!
//! A loop is identified by a back edge `n -> h` where `h` dominates `n`. The loop body is every
//! node that can reach `n` without passing through `h`, plus `h` itself. Back edges sharing a
//! header are merged into a single loop with several latches.
//!
//! ```text
//!     [preheader]
//!          |
//!          v
//!     [header] <------+
//!          |          |
//!     [body ...]      |
//!          |          |
//!     [latch] --------+
//!          |
//!          v
//!      [exit ...]
//! ```
//!
//! Detection is generic over any graph implementing [`GraphBase`], [`Successors`] and
//! [`Predecessors`], so tests exercise it on tiny hand-built graphs.

use std::collections::{BTreeSet, HashMap};

use crate::utils::graph::{algorithms::DominatorSets, GraphBase, NodeId, Predecessors, Successors};

/// Structural shape of a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopType {
    /// Every exit leaves from the header (`while`).
    PreTested,
    /// Every exit leaves from the single latch (`do ... while`).
    PostTested,
    /// The loop has no exit edges.
    Infinite,
    /// Several latches or exits spread through the body.
    Complex,
}

/// An edge leaving a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoopExit {
    /// Node inside the loop the edge leaves from
    pub exiting: NodeId,
    /// Node outside the loop the edge enters
    pub target: NodeId,
}

/// A natural loop.
#[derive(Debug, Clone)]
pub struct LoopRegion {
    /// The loop header, which dominates every node of the body.
    pub header: NodeId,
    /// All nodes of the loop, header included.
    pub body: BTreeSet<NodeId>,
    /// Sources of back edges into the header.
    pub latches: Vec<NodeId>,
    /// The single out-of-loop predecessor of the header, if there is exactly one.
    pub preheader: Option<NodeId>,
    /// Edges leaving the loop, sorted.
    pub exits: Vec<LoopExit>,
    /// Structural classification.
    pub loop_type: LoopType,
    /// Nesting depth, 1 for an outermost loop.
    pub depth: usize,
    /// Header of the smallest enclosing loop.
    pub parent: Option<NodeId>,
}

impl LoopRegion {
    fn new(header: NodeId) -> Self {
        Self {
            header,
            body: BTreeSet::from([header]),
            latches: Vec::new(),
            preheader: None,
            exits: Vec::new(),
            loop_type: LoopType::Complex,
            depth: 1,
            parent: None,
        }
    }

    /// Returns `true` if `node` belongs to the loop body.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.body.contains(&node)
    }

    /// Number of nodes in the body.
    #[must_use]
    pub fn size(&self) -> usize {
        self.body.len()
    }

    /// Returns the latch when the loop has exactly one back edge.
    #[must_use]
    pub fn single_latch(&self) -> Option<NodeId> {
        match self.latches.as_slice() {
            [latch] => Some(*latch),
            _ => None,
        }
    }

    /// Returns the exit target when every exit edge enters the same node.
    #[must_use]
    pub fn unique_exit_target(&self) -> Option<NodeId> {
        let first = self.exits.first()?.target;
        self.exits
            .iter()
            .all(|exit| exit.target == first)
            .then_some(first)
    }

    /// Returns `true` if the header has an edge leaving the loop.
    #[must_use]
    pub fn header_is_exiting(&self) -> bool {
        self.exits.iter().any(|exit| exit.exiting == self.header)
    }

    /// Returns `true` if this loop has no enclosing loop.
    #[must_use]
    pub fn is_outermost(&self) -> bool {
        self.parent.is_none()
    }
}

/// All natural loops of a graph, ordered by header index.
#[derive(Debug, Clone, Default)]
pub struct LoopForest {
    loops: Vec<LoopRegion>,
    innermost: Vec<Option<usize>>,
}

impl LoopForest {
    /// Returns the loop headed by `header`.
    #[must_use]
    pub fn loop_for_header(&self, header: NodeId) -> Option<&LoopRegion> {
        self.loops.iter().find(|l| l.header == header)
    }

    /// Returns `true` if `node` heads a loop.
    #[must_use]
    pub fn is_header(&self, node: NodeId) -> bool {
        self.loop_for_header(node).is_some()
    }

    /// Returns the most deeply nested loop containing `node`.
    #[must_use]
    pub fn innermost_loop(&self, node: NodeId) -> Option<&LoopRegion> {
        self.innermost
            .get(node.index())
            .copied()
            .flatten()
            .map(|i| &self.loops[i])
    }

    /// Number of loops containing `node`, 0 if it is not in any loop.
    #[must_use]
    pub fn loop_depth(&self, node: NodeId) -> usize {
        self.innermost_loop(node).map_or(0, |l| l.depth)
    }

    /// Iterates over loops in header order.
    pub fn iter(&self) -> impl Iterator<Item = &LoopRegion> {
        self.loops.iter()
    }

    /// Number of loops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loops.len()
    }

    /// Returns `true` if the graph is acyclic (among reachable nodes).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}

/// Finds all natural loops of `graph`.
///
/// Only edges from reachable nodes are considered, so dead cycles never form loops.
#[must_use]
pub fn detect_loops<G>(graph: &G, dominators: &DominatorSets) -> LoopForest
where
    G: GraphBase + Successors + Predecessors,
{
    let mut by_header: HashMap<NodeId, LoopRegion> = HashMap::new();

    for node in graph.node_ids() {
        if !dominators.is_reachable(node) {
            continue;
        }
        for succ in graph.successors(node) {
            if dominators.dominates(succ, node) {
                let region = by_header
                    .entry(succ)
                    .or_insert_with(|| LoopRegion::new(succ));
                if !region.latches.contains(&node) {
                    region.latches.push(node);
                }
                expand_body(graph, dominators, region, node);
            }
        }
    }

    for region in by_header.values_mut() {
        region.latches.sort();
        compute_preheader(graph, region);
        compute_exits(graph, region);
        region.loop_type = classify(region);
    }

    let mut loops: Vec<LoopRegion> = by_header.into_values().collect();
    loops.sort_by_key(|l| l.header);
    compute_nesting(&mut loops);

    let mut innermost: Vec<Option<usize>> = vec![None; graph.node_count()];
    for (i, region) in loops.iter().enumerate() {
        for node in &region.body {
            let slot = &mut innermost[node.index()];
            match *slot {
                Some(existing) if loops[existing].depth >= region.depth => {}
                _ => *slot = Some(i),
            }
        }
    }

    log::trace!("detected {} loop(s)", loops.len());
    LoopForest { loops, innermost }
}

fn expand_body<G: Predecessors>(
    graph: &G,
    dominators: &DominatorSets,
    region: &mut LoopRegion,
    latch: NodeId,
) {
    let mut worklist = vec![latch];
    while let Some(node) = worklist.pop() {
        if region.body.insert(node) {
            for pred in graph.predecessors(node) {
                if dominators.is_reachable(pred) && !region.body.contains(&pred) {
                    worklist.push(pred);
                }
            }
        }
    }
}

fn compute_preheader<G: Predecessors>(graph: &G, region: &mut LoopRegion) {
    let mut outside = graph
        .predecessors(region.header)
        .filter(|pred| !region.body.contains(pred));
    region.preheader = match (outside.next(), outside.next()) {
        (Some(pred), None) => Some(pred),
        _ => None,
    };
}

fn compute_exits<G: Successors>(graph: &G, region: &mut LoopRegion) {
    let mut exits: Vec<LoopExit> = region
        .body
        .iter()
        .flat_map(|&node| {
            graph
                .successors(node)
                .filter(|succ| !region.body.contains(succ))
                .map(move |target| LoopExit {
                    exiting: node,
                    target,
                })
        })
        .collect();
    exits.sort();
    exits.dedup();
    region.exits = exits;
}

fn classify(region: &LoopRegion) -> LoopType {
    if region.exits.is_empty() {
        return LoopType::Infinite;
    }
    if region.exits.iter().all(|e| e.exiting == region.header) {
        return LoopType::PreTested;
    }
    if let Some(latch) = region.single_latch() {
        if region.exits.iter().all(|e| e.exiting == latch) {
            return LoopType::PostTested;
        }
    }
    LoopType::Complex
}

fn compute_nesting(loops: &mut [LoopRegion]) {
    let parents: Vec<Option<NodeId>> = loops
        .iter()
        .enumerate()
        .map(|(i, inner)| {
            loops
                .iter()
                .enumerate()
                .filter(|&(j, outer)| j != i && outer.contains(inner.header))
                .min_by_key(|(_, outer)| outer.size())
                .map(|(_, outer)| outer.header)
        })
        .collect();

    for (region, parent) in loops.iter_mut().zip(&parents) {
        region.parent = *parent;
    }

    let index: HashMap<NodeId, usize> = loops
        .iter()
        .enumerate()
        .map(|(i, l)| (l.header, i))
        .collect();
    for i in 0..loops.len() {
        let mut depth = 1;
        let mut current = parents[i];
        while let Some(header) = current {
            depth += 1;
            current = index.get(&header).and_then(|&j| parents[j]);
            if depth > loops.len() {
                break;
            }
        }
        loops[i].depth = depth;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::graph::{algorithms::compute_dominators, traits::tests::TestGraph};

    fn forest(nodes: usize, edges: &[(usize, usize)]) -> LoopForest {
        let graph = TestGraph::new(nodes, edges);
        let doms = compute_dominators(&graph);
        detect_loops(&graph, &doms)
    }

    #[test]
    fn test_acyclic_has_no_loops() {
        let loops = forest(4, &[(0, 1), (1, 2), (1, 3)]);
        assert!(loops.is_empty());
        assert_eq!(loops.loop_depth(NodeId::new(2)), 0);
    }

    #[test]
    fn test_while_loop() {
        // 0 -> 1(header) -> 2 -> 1, 1 -> 3
        let loops = forest(4, &[(0, 1), (1, 2), (2, 1), (1, 3)]);
        assert_eq!(loops.len(), 1);
        let region = loops.loop_for_header(NodeId::new(1)).unwrap();
        assert_eq!(region.body, BTreeSet::from([NodeId::new(1), NodeId::new(2)]));
        assert_eq!(region.latches, vec![NodeId::new(2)]);
        assert_eq!(region.preheader, Some(NodeId::new(0)));
        assert_eq!(region.loop_type, LoopType::PreTested);
        assert_eq!(region.unique_exit_target(), Some(NodeId::new(3)));
        assert!(region.header_is_exiting());
    }

    #[test]
    fn test_do_while_loop() {
        // 0 -> 1 -> 2(latch) -> 1, 2 -> 3
        let loops = forest(4, &[(0, 1), (1, 2), (2, 1), (2, 3)]);
        let region = loops.loop_for_header(NodeId::new(1)).unwrap();
        assert_eq!(region.loop_type, LoopType::PostTested);
        assert!(!region.header_is_exiting());
    }

    #[test]
    fn test_self_loop_is_pretested() {
        let loops = forest(3, &[(0, 1), (1, 1), (1, 2)]);
        let region = loops.loop_for_header(NodeId::new(1)).unwrap();
        assert_eq!(region.latches, vec![NodeId::new(1)]);
        assert_eq!(region.size(), 1);
        assert_eq!(region.loop_type, LoopType::PreTested);
    }

    #[test]
    fn test_infinite_loop() {
        let loops = forest(3, &[(0, 1), (1, 2), (2, 1)]);
        assert_eq!(
            loops.loop_for_header(NodeId::new(1)).unwrap().loop_type,
            LoopType::Infinite
        );
    }

    #[test]
    fn test_nested_loops() {
        // outer header 1, inner header 2 with latch 3, outer latch 4
        let loops = forest(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 2), (2, 4), (4, 1), (1, 5)],
        );
        assert_eq!(loops.len(), 2);
        let inner = loops.loop_for_header(NodeId::new(2)).unwrap();
        let outer = loops.loop_for_header(NodeId::new(1)).unwrap();
        assert_eq!(inner.parent, Some(NodeId::new(1)));
        assert!(outer.is_outermost());
        assert_eq!(inner.depth, 2);
        assert_eq!(loops.loop_depth(NodeId::new(3)), 2);
        assert_eq!(loops.loop_depth(NodeId::new(4)), 1);
        assert_eq!(
            loops.innermost_loop(NodeId::new(3)).map(|l| l.header),
            Some(NodeId::new(2))
        );
    }

    #[test]
    fn test_shared_header_merges_latches() {
        // header 1 branches to 2 and 3, both jump back
        let loops = forest(5, &[(0, 1), (1, 2), (1, 3), (2, 1), (3, 1), (1, 4)]);
        assert_eq!(loops.len(), 1);
        let region = loops.loop_for_header(NodeId::new(1)).unwrap();
        assert_eq!(region.latches, vec![NodeId::new(2), NodeId::new(3)]);
        assert_eq!(region.loop_type, LoopType::PreTested);
    }

    #[test]
    fn test_unreachable_cycle_ignored() {
        let loops = forest(4, &[(0, 1), (2, 3), (3, 2)]);
        assert!(loops.is_empty());
    }

    #[test]
    fn test_unreachable_predecessor_stays_out_of_body() {
        // 0 -> 1(header) -> 2 -> 1, 1 -> 3, dead 4 -> 2
        let loops = forest(5, &[(0, 1), (1, 2), (2, 1), (1, 3), (4, 2)]);
        let region = loops.loop_for_header(NodeId::new(1)).unwrap();
        assert_eq!(region.body, BTreeSet::from([NodeId::new(1), NodeId::new(2)]));
        assert!(!region.contains(NodeId::new(4)));
        assert_eq!(region.unique_exit_target(), Some(NodeId::new(3)));
        assert_eq!(region.loop_type, LoopType::PreTested);
    }
}
