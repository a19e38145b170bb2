//! Flat expression tokens as produced by the diagram editor.
//!
//! The editor does not store text. It stores a sequence of typed
//! [`Element`]s (literal, operator, variable reference, cast function), and
//! an [`Expression`] groups those sequences into the assignment, condition or
//! plain-value shape a node needs. The parser turns them into an
//! [`AstNode`](crate::expression::AstNode) tree.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::expression::{variable::Variable, VariableType};

/// Operator and delimiter symbols allowed inside an element sequence.
///
/// [`Display`] and the serde form both use the symbol itself (`"+"`, `"&&"`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Operator {
    /// `+`
    #[serde(rename = "+")]
    #[strum(serialize = "+")]
    Plus,
    /// `-`
    #[serde(rename = "-")]
    #[strum(serialize = "-")]
    Minus,
    /// `*`
    #[serde(rename = "*")]
    #[strum(serialize = "*")]
    Multiply,
    /// `/`
    #[serde(rename = "/")]
    #[strum(serialize = "/")]
    Divide,
    /// `%`
    #[serde(rename = "%")]
    #[strum(serialize = "%")]
    Modulo,
    /// `&&`
    #[serde(rename = "&&")]
    #[strum(serialize = "&&")]
    And,
    /// `||`
    #[serde(rename = "||")]
    #[strum(serialize = "||")]
    Or,
    /// `!`
    #[serde(rename = "!")]
    #[strum(serialize = "!")]
    Not,
    /// `==`
    #[serde(rename = "==")]
    #[strum(serialize = "==")]
    Equal,
    /// `!=`
    #[serde(rename = "!=")]
    #[strum(serialize = "!=")]
    NotEqual,
    /// `>`
    #[serde(rename = ">")]
    #[strum(serialize = ">")]
    Greater,
    /// `<`
    #[serde(rename = "<")]
    #[strum(serialize = "<")]
    Less,
    /// `>=`
    #[serde(rename = ">=")]
    #[strum(serialize = ">=")]
    GreaterEqual,
    /// `<=`
    #[serde(rename = "<=")]
    #[strum(serialize = "<=")]
    LessEqual,
    /// `(`
    #[serde(rename = "(")]
    #[strum(serialize = "(")]
    OpenParen,
    /// `)`
    #[serde(rename = ")")]
    #[strum(serialize = ")")]
    CloseParen,
    /// `[`
    #[serde(rename = "[")]
    #[strum(serialize = "[")]
    OpenBracket,
    /// `]`
    #[serde(rename = "]")]
    #[strum(serialize = "]")]
    CloseBracket,
}

impl Operator {
    /// Returns `true` for `== != > < >= <=`.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::Equal
                | Operator::NotEqual
                | Operator::Greater
                | Operator::Less
                | Operator::GreaterEqual
                | Operator::LessEqual
        )
    }
}

/// The builtin cast functions.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FunctionName {
    /// `integer(x)`
    Integer,
    /// `string(x)`
    String,
    /// `float(x)`
    Float,
    /// `boolean(x)`
    Boolean,
}

impl FunctionName {
    /// Returns the type a call to this function produces.
    #[must_use]
    pub const fn result_type(self) -> VariableType {
        match self {
            FunctionName::Integer => VariableType::Integer,
            FunctionName::String => VariableType::String,
            FunctionName::Float => VariableType::Float,
            FunctionName::Boolean => VariableType::Boolean,
        }
    }

    /// Returns the cast function producing `ty`, if `ty` is a scalar.
    #[must_use]
    pub const fn for_type(ty: VariableType) -> Option<FunctionName> {
        match ty {
            VariableType::Integer => Some(FunctionName::Integer),
            VariableType::String => Some(FunctionName::String),
            VariableType::Float => Some(FunctionName::Float),
            VariableType::Boolean => Some(FunctionName::Boolean),
            VariableType::Array => None,
        }
    }
}

/// One token of an expression.
///
/// Serialized adjacently tagged: `{"type": "operator", "value": "+"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Element {
    /// Literal surface text such as `5`, `2.5`, `true` or `"hi"`.
    Literal(String),
    /// Operator or delimiter.
    Operator(Operator),
    /// Variable reference, possibly carrying an index expression.
    Variable(Variable),
    /// Cast function applied to a nested expression.
    Function {
        /// Which cast.
        name: FunctionName,
        /// The argument sequence, parsed independently of the outer sequence.
        argument: Vec<Element>,
    },
}

impl Element {
    /// Creates a literal element.
    pub fn literal(text: impl Into<String>) -> Self {
        Element::Literal(text.into())
    }

    /// Creates an operator element.
    #[must_use]
    pub const fn op(op: Operator) -> Self {
        Element::Operator(op)
    }

    /// Creates a variable reference element.
    #[must_use]
    pub fn var(variable: &Variable) -> Self {
        Element::Variable(variable.clone())
    }

    /// Creates a cast function element.
    #[must_use]
    pub fn function(name: FunctionName, argument: Vec<Element>) -> Self {
        Element::Function { name, argument }
    }
}

/// Left-hand side of an expression.
///
/// Assignments name a [`Variable`], conditions carry a token sequence. The
/// two serialize as a JSON object and a JSON array respectively.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeftSide {
    /// Assignment target.
    Variable(Variable),
    /// Left operand of a comparison.
    Elements(Vec<Element>),
}

/// An expression as stored on a node.
///
/// | Shape | `left_side` | `equality` |
/// |-------|-------------|------------|
/// | assignment | `Variable` | absent |
/// | condition | `Elements` | relational operator |
/// | pure value | absent | absent |
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expression {
    /// Assignment target or comparison left operand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_side: Option<LeftSide>,
    /// Value sequence, or right operand of a comparison.
    #[serde(default)]
    pub right_side: Vec<Element>,
    /// Comparison operator joining both sides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equality: Option<Operator>,
}

impl Expression {
    /// Creates an assignment `target = value`.
    #[must_use]
    pub fn assignment(target: Variable, value: Vec<Element>) -> Self {
        Expression {
            left_side: Some(LeftSide::Variable(target)),
            right_side: value,
            equality: None,
        }
    }

    /// Creates a comparison `left op right`.
    #[must_use]
    pub fn condition(left: Vec<Element>, op: Operator, right: Vec<Element>) -> Self {
        Expression {
            left_side: Some(LeftSide::Elements(left)),
            right_side: right,
            equality: Some(op),
        }
    }

    /// Creates a value expression without left side.
    #[must_use]
    pub fn value(elements: Vec<Element>) -> Self {
        Expression {
            left_side: None,
            right_side: elements,
            equality: None,
        }
    }

    /// Returns the assignment target, if this is an assignment.
    #[must_use]
    pub fn target(&self) -> Option<&Variable> {
        match &self.left_side {
            Some(LeftSide::Variable(variable)) => Some(variable),
            _ => None,
        }
    }
}
