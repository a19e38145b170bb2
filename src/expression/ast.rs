//! Typed expression tree.

use std::fmt;

use strum::{Display, EnumIter};

use crate::expression::{element::FunctionName, Operator, Value, Variable, VariableType};

/// Binary operators, loosest level first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum BinaryOperator {
    /// `==`
    #[strum(serialize = "==")]
    Equal,
    /// `!=`
    #[strum(serialize = "!=")]
    NotEqual,
    /// `>`
    #[strum(serialize = ">")]
    Greater,
    /// `<`
    #[strum(serialize = "<")]
    Less,
    /// `>=`
    #[strum(serialize = ">=")]
    GreaterEqual,
    /// `<=`
    #[strum(serialize = "<=")]
    LessEqual,
    /// `||`
    #[strum(serialize = "||")]
    Or,
    /// `&&`
    #[strum(serialize = "&&")]
    And,
    /// `+`
    #[strum(serialize = "+")]
    Add,
    /// `-`
    #[strum(serialize = "-")]
    Subtract,
    /// `*`
    #[strum(serialize = "*")]
    Multiply,
    /// `/`
    #[strum(serialize = "/")]
    Divide,
    /// `%`
    #[strum(serialize = "%")]
    Modulo,
}

impl BinaryOperator {
    /// Maps an element operator to its binary form.
    #[must_use]
    pub const fn from_operator(op: Operator) -> Option<Self> {
        Some(match op {
            Operator::Equal => BinaryOperator::Equal,
            Operator::NotEqual => BinaryOperator::NotEqual,
            Operator::Greater => BinaryOperator::Greater,
            Operator::Less => BinaryOperator::Less,
            Operator::GreaterEqual => BinaryOperator::GreaterEqual,
            Operator::LessEqual => BinaryOperator::LessEqual,
            Operator::Or => BinaryOperator::Or,
            Operator::And => BinaryOperator::And,
            Operator::Plus => BinaryOperator::Add,
            Operator::Minus => BinaryOperator::Subtract,
            Operator::Multiply => BinaryOperator::Multiply,
            Operator::Divide => BinaryOperator::Divide,
            Operator::Modulo => BinaryOperator::Modulo,
            _ => return None,
        })
    }

    /// Returns `true` for `== != > < >= <=`.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOperator::Equal
                | BinaryOperator::NotEqual
                | BinaryOperator::Greater
                | BinaryOperator::Less
                | BinaryOperator::GreaterEqual
                | BinaryOperator::LessEqual
        )
    }

    /// Returns `true` for `&&` and `||`.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

/// Prefix operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum UnaryOperator {
    /// `!`
    #[strum(serialize = "!")]
    Not,
    /// `-`
    #[strum(serialize = "-")]
    Negate,
    /// `+`
    #[strum(serialize = "+")]
    Plus,
}

/// A variable reference as it appears in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    /// Source-level name.
    pub name: String,
    /// The referenced declaration, index stripped.
    pub variable: Variable,
}

impl Identifier {
    /// Creates an identifier for `variable`.
    #[must_use]
    pub fn new(variable: &Variable) -> Self {
        Identifier {
            name: variable.name.clone(),
            variable: variable.without_index(),
        }
    }
}

/// A node of the expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum AstNode {
    /// Constant with the type its surface form implies.
    Literal {
        /// The constant
        value: Value,
        /// Its type
        ty: VariableType,
    },
    /// Variable read.
    Identifier(Identifier),
    /// Prefix operation.
    UnaryOp {
        /// Operator
        op: UnaryOperator,
        /// Operand
        operand: Box<AstNode>,
    },
    /// Infix operation.
    BinaryOp {
        /// Operator
        op: BinaryOperator,
        /// Left operand
        left: Box<AstNode>,
        /// Right operand
        right: Box<AstNode>,
    },
    /// Array element read `object[index]`.
    MemberAccess {
        /// The array
        object: Identifier,
        /// Index expression
        index: Box<AstNode>,
    },
    /// Cast function call.
    FunctionCall {
        /// Which cast
        name: FunctionName,
        /// Its argument
        argument: Box<AstNode>,
    },
}

impl AstNode {
    /// Creates a binary node.
    #[must_use]
    pub fn binary(op: BinaryOperator, left: AstNode, right: AstNode) -> Self {
        AstNode::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a unary node.
    #[must_use]
    pub fn unary(op: UnaryOperator, operand: AstNode) -> Self {
        AstNode::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Literal {
                value: Value::String(s),
                ..
            } => write!(f, "\"{s}\""),
            AstNode::Literal { value, .. } => write!(f, "{value}"),
            AstNode::Identifier(ident) => f.write_str(&ident.name),
            AstNode::UnaryOp { op, operand } => write!(f, "{op}{operand}"),
            AstNode::BinaryOp { op, left, right } => write!(f, "({left} {op} {right})"),
            AstNode::MemberAccess { object, index } => write!(f, "{}[{index}]", object.name),
            AstNode::FunctionCall { name, argument } => write!(f, "{name}({argument})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_every_arithmetic_and_relational_operator_maps() {
        for op in BinaryOperator::iter() {
            let symbol = op.to_string();
            let element: Operator = symbol.parse().unwrap();
            assert_eq!(BinaryOperator::from_operator(element), Some(op));
        }
        assert_eq!(BinaryOperator::from_operator(Operator::OpenParen), None);
        assert_eq!(BinaryOperator::from_operator(Operator::Not), None);
    }

    #[test]
    fn test_display_is_fully_parenthesized() {
        let x = Variable::scalar("x", "x", VariableType::Integer);
        let tree = AstNode::binary(
            BinaryOperator::Multiply,
            AstNode::binary(
                BinaryOperator::Add,
                AstNode::Identifier(Identifier::new(&x)),
                AstNode::Literal {
                    value: Value::Integer(1),
                    ty: VariableType::Integer,
                },
            ),
            AstNode::unary(
                UnaryOperator::Negate,
                AstNode::Literal {
                    value: Value::Integer(2),
                    ty: VariableType::Integer,
                },
            ),
        );
        assert_eq!(tree.to_string(), "((x + 1) * -2)");
    }
}
