//! Programmatic construction of diagrams.

use crate::{
    expression::{Expression, Variable},
    flowchart::{BranchLabel, Diagram, FlowEdge, FlowNode, NodeKind},
};

/// Fluent builder for [`Diagram`]s.
///
/// Node ids are taken as given; the builder does not validate anything.
/// Validation happens when the diagram is turned into a
/// [`FlowCfg`](crate::analysis::FlowCfg).
///
/// # Examples
///
/// ```rust
/// use flowscope::expression::{Element, Expression, Operator, Variable, VariableType};
/// use flowscope::flowchart::DiagramBuilder;
///
/// let x = Variable::scalar("x", "x", VariableType::Integer);
/// let diagram = DiagramBuilder::new()
///     .start("s")
///     .conditional(
///         "c",
///         Expression::condition(vec![Element::var(&x)], Operator::Greater, vec![Element::literal("0")]),
///     )
///     .end("e")
///     .edge("s", "c")
///     .yes("c", "c")
///     .no("c", "e")
///     .build();
///
/// assert_eq!(diagram.nodes.len(), 3);
/// assert_eq!(diagram.edges.len(), 3);
/// ```
#[derive(Debug, Default, Clone)]
pub struct DiagramBuilder {
    nodes: Vec<FlowNode>,
    edges: Vec<FlowEdge>,
}

impl DiagramBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an arbitrary node.
    #[must_use]
    pub fn node(mut self, node: FlowNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Adds a `Start` node.
    #[must_use]
    pub fn start(self, id: &str) -> Self {
        self.node(FlowNode::new(id, NodeKind::Start))
    }

    /// Adds an `End` node.
    #[must_use]
    pub fn end(self, id: &str) -> Self {
        self.node(FlowNode::new(id, NodeKind::End))
    }

    /// Adds a `DeclareVariable` node.
    #[must_use]
    pub fn declare(self, id: &str, variables: Vec<Variable>) -> Self {
        let variables = variables.into_iter().map(|v| v.declared_in(id)).collect();
        self.node(FlowNode::new(id, NodeKind::DeclareVariable { variables }))
    }

    /// Adds an `AssignVariable` node.
    #[must_use]
    pub fn assign(self, id: &str, expression: Expression) -> Self {
        self.node(FlowNode::new(id, NodeKind::AssignVariable { expression }))
    }

    /// Adds an `Input` node.
    #[must_use]
    pub fn input(self, id: &str, variable: Variable) -> Self {
        self.node(FlowNode::new(id, NodeKind::Input { variable }))
    }

    /// Adds an `Output` node.
    #[must_use]
    pub fn output(self, id: &str, expression: Expression) -> Self {
        self.node(FlowNode::new(id, NodeKind::Output { expression }))
    }

    /// Adds a `Conditional` node.
    #[must_use]
    pub fn conditional(self, id: &str, expression: Expression) -> Self {
        self.node(FlowNode::new(id, NodeKind::Conditional { expression }))
    }

    /// Adds an unlabeled edge.
    #[must_use]
    pub fn edge(mut self, source: &str, target: &str) -> Self {
        self.edges.push(FlowEdge::new(source, target));
        self
    }

    /// Adds a "yes" edge.
    #[must_use]
    pub fn yes(mut self, source: &str, target: &str) -> Self {
        self.edges.push(FlowEdge::branch(source, target, BranchLabel::Yes));
        self
    }

    /// Adds a "no" edge.
    #[must_use]
    pub fn no(mut self, source: &str, target: &str) -> Self {
        self.edges.push(FlowEdge::branch(source, target, BranchLabel::No));
        self
    }

    /// Adds unlabeled edges along a path of node ids.
    #[must_use]
    pub fn chain(mut self, ids: &[&str]) -> Self {
        for pair in ids.windows(2) {
            self.edges.push(FlowEdge::new(pair[0], pair[1]));
        }
        self
    }

    /// Finishes the diagram.
    #[must_use]
    pub fn build(self) -> Diagram {
        Diagram {
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}
