//! Typed parse and evaluation failures.

use thiserror::Error;

use crate::expression::{element::FunctionName, Operator, VariableType};

/// Errors raised while turning an element sequence into an [`AstNode`](crate::expression::AstNode).
///
/// Positions are zero-based indices into the element sequence being parsed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The sequence ended where an operand was expected.
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    /// A token appeared where it cannot start or continue an expression.
    #[error("unexpected token '{token}' at position {position}")]
    UnexpectedToken {
        /// Rendered token
        token: String,
        /// Position in the sequence
        position: usize,
    },

    /// A `(` or `[` was never closed.
    #[error("missing '{expected}' at position {position}")]
    MissingDelimiter {
        /// The closing delimiter that was expected
        expected: Operator,
        /// Position where it was expected
        position: usize,
    },

    /// A complete expression was parsed but tokens remain.
    #[error("unexpected trailing tokens starting at position {position}")]
    TrailingTokens {
        /// Position of the first leftover token
        position: usize,
    },

    /// A subscript was applied to a variable that is not an array.
    #[error("variable '{name}' is not an array and cannot be indexed")]
    NotAnArray {
        /// Variable name
        name: String,
    },

    /// A literal has no recognizable surface form.
    #[error("invalid literal '{text}'")]
    InvalidLiteral {
        /// The literal text
        text: String,
    },

    /// A cast function has an empty argument.
    #[error("function '{name}' requires an argument")]
    EmptyArgument {
        /// The function
        name: FunctionName,
    },

    /// A condition joins its sides with a non-relational operator.
    #[error("'{op}' is not a comparison operator")]
    NotAComparison {
        /// The offending operator
        op: Operator,
    },

    /// A condition has a left side but no comparison operator.
    #[error("condition is missing its comparison operator")]
    MissingComparison,

    /// The expression nests deeper than the parser allows.
    #[error("expression nests deeper than {limit} levels")]
    TooDeep {
        /// The nesting limit
        limit: usize,
    },
}

/// Errors raised while evaluating an expression tree or applying an assignment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A variable was read before anything was assigned to it.
    #[error("variable '{name}' has no value")]
    Unassigned {
        /// Variable name
        name: String,
    },

    /// Division with a zero divisor.
    #[error("division by zero")]
    DivisionByZero,

    /// Modulo with a zero divisor.
    #[error("modulo by zero")]
    ModuloByZero,

    /// Array index outside `0..size`.
    #[error("index {index} out of bounds for '{name}' of size {size}")]
    IndexOutOfBounds {
        /// Array name
        name: String,
        /// The evaluated index
        index: i64,
        /// Declared size
        size: usize,
    },

    /// Array index evaluated to a non-integer.
    #[error("index of '{name}' must be an integer, found {found}")]
    IndexNotInteger {
        /// Array name
        name: String,
        /// Type the index evaluated to
        found: VariableType,
    },

    /// An operator was applied to operand types it does not accept.
    #[error("type mismatch: cannot apply '{operation}' to {operands}")]
    TypeMismatch {
        /// The operator symbol
        operation: String,
        /// Rendered operand types, e.g. `string and integer`
        operands: String,
    },

    /// A value cannot be coerced to the type expected by its context.
    #[error("type mismatch: expected {expected}, found {found}")]
    UnexpectedType {
        /// Expected type
        expected: VariableType,
        /// Actual type
        found: VariableType,
    },

    /// A cast function could not convert its argument.
    #[error("cannot convert '{value}' to {target}")]
    InvalidConversion {
        /// Rendered source value
        value: String,
        /// Target type
        target: VariableType,
    },

    /// Integer arithmetic overflowed.
    #[error("integer overflow in '{operation}'")]
    Overflow {
        /// The operator symbol
        operation: String,
    },

    /// An array variable misses its element type or size.
    #[error("array '{name}' has no complete element type and size")]
    IncompleteArrayType {
        /// Array name
        name: String,
    },

    /// A stored array binding does not have the declared length.
    #[error("array '{name}' holds {found} elements, declared size is {expected}")]
    ArrayLengthMismatch {
        /// Array name
        name: String,
        /// Declared size
        expected: usize,
        /// Stored length
        found: usize,
    },

    /// An assignment targets a whole array instead of one element.
    #[error("cannot assign to array '{name}' without an index")]
    WholeArrayAssignment {
        /// Array name
        name: String,
    },

    /// The expression has no variable on its left side.
    #[error("expression is not an assignment")]
    NotAnAssignment,
}

impl EvalError {
    pub(crate) fn mismatch(operation: impl ToString, operands: &[VariableType]) -> Self {
        let operands = operands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" and ");
        EvalError::TypeMismatch {
            operation: operation.to_string(),
            operands,
        }
    }
}
