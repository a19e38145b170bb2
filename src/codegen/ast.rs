//! Target-language syntax tree.
//!
//! A small structured-imperative language with Python-like surface syntax. The tree is
//! regenerated from scratch on every compile and serializes to JSON for tooling.

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::{expression::Value, flowchart::FlowNode};

/// Where a statement or expression came from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    /// Diagram id of the originating node.
    pub node_id: String,
    /// Display label of the originating node.
    pub label: String,
}

impl Provenance {
    /// Provenance pointing at `node`.
    #[must_use]
    pub fn of(node: &FlowNode) -> Self {
        Provenance {
            node_id: node.id.clone(),
            label: node.display_label().to_string(),
        }
    }
}

/// A complete generated program.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Program {
    /// Top-level statements in execution order.
    pub statements: Vec<Statement>,
}

/// A statement with optional provenance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Statement {
    /// What the statement does.
    #[serde(flatten)]
    pub kind: StatementKind,
    /// Originating diagram node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl Statement {
    /// A statement without provenance.
    #[must_use]
    pub fn new(kind: StatementKind) -> Self {
        Statement {
            kind,
            provenance: None,
        }
    }

    /// Sets the provenance.
    #[must_use]
    pub fn from_node(mut self, node: &FlowNode) -> Self {
        self.provenance = Some(Provenance::of(node));
        self
    }

    /// An `Unsupported` marker.
    #[must_use]
    pub fn unsupported(reason: impl Into<String>) -> Self {
        Statement::new(StatementKind::Unsupported {
            reason: reason.into(),
        })
    }

    /// Returns `true` for `Unsupported` markers.
    #[must_use]
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, StatementKind::Unsupported { .. })
    }
}

/// Statement kinds.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StatementKind {
    /// `target = value`
    Assignment {
        /// An identifier or subscript
        target: Expr,
        /// Assigned value
        value: Expr,
    },
    /// `if test: ... else: ...`
    If {
        /// Branch condition
        test: Expr,
        /// Statements run when the test holds
        then: Vec<Statement>,
        /// Statements run otherwise, possibly empty
        otherwise: Vec<Statement>,
    },
    /// `while test: ...`
    While {
        /// Loop condition
        test: Expr,
        /// Loop body
        body: Vec<Statement>,
    },
    /// `print(args...)`
    Print {
        /// Printed values
        args: Vec<Expr>,
    },
    /// `break`
    Break,
    /// Placeholder for flow that could not be lowered.
    Unsupported {
        /// Human readable cause
        reason: String,
    },
}

/// Binary operators of the target language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum BinOp {
    /// `==`
    #[strum(serialize = "==")]
    #[serde(rename = "==")]
    Eq,
    /// `!=`
    #[strum(serialize = "!=")]
    #[serde(rename = "!=")]
    NotEq,
    /// `>`
    #[strum(serialize = ">")]
    #[serde(rename = ">")]
    Gt,
    /// `<`
    #[strum(serialize = "<")]
    #[serde(rename = "<")]
    Lt,
    /// `>=`
    #[strum(serialize = ">=")]
    #[serde(rename = ">=")]
    GtE,
    /// `<=`
    #[strum(serialize = "<=")]
    #[serde(rename = "<=")]
    LtE,
    /// `or`
    #[strum(serialize = "or")]
    #[serde(rename = "or")]
    Or,
    /// `and`
    #[strum(serialize = "and")]
    #[serde(rename = "and")]
    And,
    /// `+`
    #[strum(serialize = "+")]
    #[serde(rename = "+")]
    Add,
    /// `-`
    #[strum(serialize = "-")]
    #[serde(rename = "-")]
    Sub,
    /// `*`
    #[strum(serialize = "*")]
    #[serde(rename = "*")]
    Mul,
    /// `/`
    #[strum(serialize = "/")]
    #[serde(rename = "/")]
    Div,
    /// `%`
    #[strum(serialize = "%")]
    #[serde(rename = "%")]
    Mod,
}

/// Unary operators of the target language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum UnaryOp {
    /// `not`
    #[strum(serialize = "not")]
    #[serde(rename = "not")]
    Not,
    /// `-`
    #[strum(serialize = "-")]
    #[serde(rename = "-")]
    Neg,
    /// `+`
    #[strum(serialize = "+")]
    #[serde(rename = "+")]
    Pos,
}

/// An expression with optional provenance.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Expr {
    /// The expression itself.
    #[serde(flatten)]
    pub kind: ExprKind,
    /// Originating diagram node, set on statement-level expressions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
}

impl Expr {
    /// An expression without provenance.
    #[must_use]
    pub fn new(kind: ExprKind) -> Self {
        Expr {
            kind,
            provenance: None,
        }
    }

    /// A name reference.
    #[must_use]
    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::new(ExprKind::Identifier(name.into()))
    }

    /// A constant.
    #[must_use]
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::new(ExprKind::Literal(value.into()))
    }

    /// A call of a builtin.
    #[must_use]
    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::Call {
            function: function.into(),
            args,
        })
    }

    /// `left op right`
    #[must_use]
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// `op operand`
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::new(ExprKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// `object[index]`
    #[must_use]
    pub fn subscript(object: Expr, index: Expr) -> Self {
        Expr::new(ExprKind::Subscript {
            object: Box::new(object),
            index: Box::new(index),
        })
    }

    /// Logical negation, folding a double `not`.
    #[must_use]
    pub fn negated(self) -> Self {
        match self.kind {
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => *operand,
            _ => Expr::unary(UnaryOp::Not, self),
        }
    }

    /// Sets the provenance.
    #[must_use]
    pub fn from_node(mut self, node: &FlowNode) -> Self {
        self.provenance = Some(Provenance::of(node));
        self
    }
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ExprKind {
    /// A variable name.
    Identifier(String),
    /// A constant.
    Literal(Value),
    /// A binary operation.
    Binary {
        /// Operator
        op: BinOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// A prefix operation.
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// A builtin call.
    Call {
        /// Callee name
        function: String,
        /// Arguments
        args: Vec<Expr>,
    },
    /// An element access.
    Subscript {
        /// Indexed value
        object: Box<Expr>,
        /// Index
        index: Box<Expr>,
    },
}
