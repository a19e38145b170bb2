//! The flowchart control-flow graph.

use std::{collections::HashMap, fmt::Write, sync::OnceLock};

use crate::{
    analysis::cfg::{
        edge::CfgEdgeKind,
        loops::{detect_loops, LoopForest},
    },
    flowchart::{BranchLabel, FlowEdge, FlowNode, NodeKind},
    utils::{
        escape_dot,
        graph::{
            algorithms::{compute_dominators, reverse_postorder, DominatorSets},
            DirectedGraph, EdgeId, GraphBase, NodeId, Predecessors, RootedGraph, Successors,
        },
    },
    Error, Result,
};

/// Control-flow graph over flowchart nodes.
///
/// Nodes keep their input order, so `NodeId::new(i)` is the `i`-th node of the slice passed to
/// [`FlowCfg::build`]. The graph owns clones of the nodes; the caller's diagram is never
/// retained.
///
/// # Lazy Analyses
///
/// Dominators and loops are computed on first access and cached in a [`OnceLock`], so a
/// shared `&FlowCfg` can be queried from several threads.
///
/// # Examples
///
/// ```rust
/// use flowscope::{analysis::FlowCfg, flowchart::DiagramBuilder};
///
/// let diagram = DiagramBuilder::new()
///     .start("s")
///     .end("e")
///     .edge("s", "e")
///     .build();
///
/// let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges)?;
/// assert_eq!(cfg.node_count(), 2);
/// assert_eq!(cfg.next(cfg.entry()), cfg.node_id("e"));
/// assert!(cfg.loops().is_empty());
/// # Ok::<(), flowscope::Error>(())
/// ```
#[derive(Debug)]
pub struct FlowCfg {
    graph: DirectedGraph<FlowNode, CfgEdgeKind>,
    entry: NodeId,
    index: HashMap<String, NodeId>,
    exits: Vec<NodeId>,
    dominators: OnceLock<DominatorSets>,
    loops: OnceLock<LoopForest>,
}

impl FlowCfg {
    /// Builds the CFG from a node list and an edge list.
    ///
    /// # Errors
    ///
    /// - [`Error::Empty`] if `nodes` is empty
    /// - [`Error::DuplicateNode`] if two nodes share an id
    /// - [`Error::NoEntry`] if there is no `Start` node
    /// - [`Error::MultipleEntries`] if there is more than one
    ///
    /// Edges naming unknown nodes, and a second edge with the same label
    /// leaving a conditional, are skipped with a warning.
    pub fn build(nodes: &[FlowNode], edges: &[FlowEdge]) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::Empty);
        }

        let mut graph = DirectedGraph::with_capacity(nodes.len(), edges.len());
        let mut index = HashMap::with_capacity(nodes.len());
        let mut starts = Vec::new();

        for node in nodes {
            if index.contains_key(&node.id) {
                return Err(Error::DuplicateNode(node.id.clone()));
            }
            let id = graph.add_node(node.clone());
            index.insert(node.id.clone(), id);
            if matches!(node.kind, NodeKind::Start) {
                starts.push(id);
            }
        }

        let entry = match starts.as_slice() {
            [] => return Err(Error::NoEntry),
            [entry] => *entry,
            many => return Err(Error::MultipleEntries(many.len())),
        };

        for edge in edges {
            let (Some(&source), Some(&target)) = (index.get(&edge.source), index.get(&edge.target))
            else {
                log::warn!(
                    "skipping edge {} -> {}: unknown endpoint",
                    edge.source,
                    edge.target
                );
                continue;
            };

            let kind = CfgEdgeKind::from_label(edge.label);
            if kind.is_conditional()
                && graph
                    .outgoing_edges(source)
                    .any(|(_, _, existing)| *existing == kind)
            {
                log::warn!(
                    "skipping edge {} -> {}: {} already has a '{}' branch",
                    edge.source,
                    edge.target,
                    edge.source,
                    kind
                );
                continue;
            }

            graph.add_edge(source, target, kind)?;
        }

        let exits = graph.exit_nodes().collect();

        log::debug!(
            "built CFG with {} node(s), {} edge(s), entry {}",
            graph.node_count(),
            graph.edge_count(),
            entry
        );

        Ok(FlowCfg {
            graph,
            entry,
            index,
            exits,
            dominators: OnceLock::new(),
            loops: OnceLock::new(),
        })
    }

    /// The `Start` node.
    #[must_use]
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    /// Nodes without outgoing edges.
    #[must_use]
    pub fn exits(&self) -> &[NodeId] {
        &self.exits
    }

    /// Returns the flowchart node for `node`.
    #[must_use]
    pub fn node(&self, node: NodeId) -> Option<&FlowNode> {
        self.graph.node(node)
    }

    /// Resolves a diagram node id.
    #[must_use]
    pub fn node_id(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges kept after validation.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over `(id, node)` pairs in input order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &FlowNode)> + '_ {
        self.graph.nodes()
    }

    /// Direct successors of `node`, in edge order.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.successors(node)
    }

    /// Direct predecessors of `node`, in edge order.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.predecessors(node)
    }

    /// Outgoing edges of `node` as `(edge, target, kind)`.
    pub fn outgoing_edges(
        &self,
        node: NodeId,
    ) -> impl Iterator<Item = (EdgeId, NodeId, CfgEdgeKind)> + '_ {
        self.graph
            .outgoing_edges(node)
            .map(|(edge, target, kind)| (edge, target, *kind))
    }

    /// Target of the `label` branch leaving `node`.
    #[must_use]
    pub fn branch_target(&self, node: NodeId, label: BranchLabel) -> Option<NodeId> {
        self.outgoing_edges(node)
            .find(|(_, _, kind)| kind.label() == Some(label))
            .map(|(_, target, _)| target)
    }

    /// Fall-through successor of `node`: the target of its first outgoing edge.
    #[must_use]
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.graph.successors(node).next()
    }

    /// Nodes reachable from the entry, in reverse postorder.
    #[must_use]
    pub fn reverse_postorder(&self) -> Vec<NodeId> {
        reverse_postorder(self, self.entry)
    }

    /// Dominator sets, computed on first call.
    pub fn dominators(&self) -> &DominatorSets {
        self.dominators.get_or_init(|| {
            let doms = compute_dominators(self);
            log::debug!("dominators converged after {} sweep(s)", doms.iterations());
            doms
        })
    }

    /// Natural loops, computed on first call.
    pub fn loops(&self) -> &LoopForest {
        self.loops.get_or_init(|| {
            let forest = detect_loops(self, self.dominators());
            log::debug!("found {} natural loop(s)", forest.len());
            forest
        })
    }

    /// Renders the graph in Graphviz DOT format.
    ///
    /// The entry is filled green, exits coral. Conditional edges are labeled
    /// `yes` / `no`.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = String::new();

        dot.push_str("digraph CFG {\n");
        if let Some(name) = title {
            let _ = writeln!(dot, "    label=\"{}\";", escape_dot(name));
        }
        dot.push_str("    labelloc=t;\n");
        dot.push_str("    node [shape=box, fontname=\"Courier\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Courier\", fontsize=9];\n\n");

        for (id, node) in self.graph.nodes() {
            let shape = if matches!(node.kind, NodeKind::Conditional { .. }) {
                ", shape=diamond"
            } else {
                ""
            };
            let style = if id == self.entry {
                ", style=filled, fillcolor=lightgreen"
            } else if self.exits.contains(&id) {
                ", style=filled, fillcolor=lightcoral"
            } else {
                ""
            };
            let _ = writeln!(
                dot,
                "    {id} [label=\"[{}] {}\"{shape}{style}];",
                escape_dot(&node.id),
                escape_dot(node.display_label())
            );
        }

        dot.push('\n');
        for (id, _) in self.graph.nodes() {
            for (_, target, kind) in self.outgoing_edges(id) {
                match kind.label() {
                    Some(label) => {
                        let _ = writeln!(dot, "    {id} -> {target} [label=\"{label}\"];");
                    }
                    None => {
                        let _ = writeln!(dot, "    {id} -> {target};");
                    }
                }
            }
        }

        dot.push_str("}\n");
        dot
    }
}

impl GraphBase for FlowCfg {
    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        self.graph.node_ids()
    }
}

impl Successors for FlowCfg {
    fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.successors(node)
    }
}

impl Predecessors for FlowCfg {
    fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> {
        self.graph.predecessors(node)
    }
}

impl RootedGraph for FlowCfg {
    fn entry(&self) -> NodeId {
        self.entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        flowchart::DiagramBuilder,
        test::{if_else_diagram, self_loop_diagram, while_diagram},
    };

    #[test]
    fn test_build_linear() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .end("e")
            .edge("s", "e")
            .build();
        let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges).unwrap();

        assert_eq!(cfg.entry(), NodeId::new(0));
        assert_eq!(cfg.exits(), &[NodeId::new(1)]);
        assert_eq!(cfg.node_id("e"), Some(NodeId::new(1)));
        assert_eq!(cfg.node_id("missing"), None);
        assert_eq!(cfg.next(cfg.entry()), Some(NodeId::new(1)));
        assert_eq!(cfg.node(NodeId::new(1)).map(|n| n.id.as_str()), Some("e"));
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(FlowCfg::build(&[], &[]), Err(Error::Empty)));

        let no_start = DiagramBuilder::new().end("e").build();
        assert!(matches!(
            FlowCfg::build(&no_start.nodes, &no_start.edges),
            Err(Error::NoEntry)
        ));

        let two_starts = DiagramBuilder::new().start("a").start("b").build();
        assert!(matches!(
            FlowCfg::build(&two_starts.nodes, &two_starts.edges),
            Err(Error::MultipleEntries(2))
        ));

        let duplicate = DiagramBuilder::new().start("a").end("a").build();
        assert!(matches!(
            FlowCfg::build(&duplicate.nodes, &duplicate.edges),
            Err(Error::DuplicateNode(id)) if id == "a"
        ));
    }

    #[test]
    fn test_dangling_edges_skipped() {
        let diagram = DiagramBuilder::new()
            .start("s")
            .end("e")
            .edge("s", "nowhere")
            .edge("ghost", "e")
            .edge("s", "e")
            .build();
        let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges).unwrap();
        assert_eq!(cfg.edge_count(), 1);
        assert_eq!(cfg.next(cfg.entry()), cfg.node_id("e"));
    }

    #[test]
    fn test_duplicate_branch_label_skipped() {
        let mut diagram = if_else_diagram();
        diagram
            .edges
            .push(FlowEdge::branch("c", "e", BranchLabel::Yes));
        let baseline = if_else_diagram();

        let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges).unwrap();
        assert_eq!(cfg.edge_count(), baseline.edges.len());
        let c = cfg.node_id("c").unwrap();
        assert_eq!(cfg.branch_target(c, BranchLabel::Yes), cfg.node_id("pos"));
        assert_eq!(cfg.branch_target(c, BranchLabel::No), cfg.node_id("neg"));
    }

    #[test]
    fn test_dominators_and_loops_cached() {
        let diagram = while_diagram();
        let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges).unwrap();

        let first: *const DominatorSets = cfg.dominators();
        let second: *const DominatorSets = cfg.dominators();
        assert_eq!(first, second);

        let header = cfg.node_id("c").unwrap();
        assert!(cfg.loops().is_header(header));
        assert!(cfg.dominators().dominates(cfg.entry(), header));
    }

    #[test]
    fn test_self_loop() {
        let diagram = self_loop_diagram();
        let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges).unwrap();
        let c = cfg.node_id("c").unwrap();
        assert_eq!(cfg.branch_target(c, BranchLabel::Yes), Some(c));
        let region = cfg.loops().loop_for_header(c).unwrap();
        assert_eq!(region.size(), 1);
    }

    #[test]
    fn test_to_dot() {
        let diagram = if_else_diagram();
        let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges).unwrap();
        let dot = cfg.to_dot(Some("branches"));

        assert!(dot.starts_with("digraph CFG {"));
        assert!(dot.contains("label=\"branches\";"));
        assert!(dot.contains("fillcolor=lightgreen"));
        assert!(dot.contains("fillcolor=lightcoral"));
        assert!(dot.contains("shape=diamond"));
        assert!(dot.contains("[label=\"yes\"]"));
        assert!(dot.contains("[label=\"no\"]"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_cfg_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FlowCfg>();
    }
}
