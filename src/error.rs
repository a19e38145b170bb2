use thiserror::Error;

use crate::expression::{EvalError, ParseError};

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Expression failures keep their typed detail inside [`Error::Parse`] and [`Error::Eval`], so a
/// caller can match on the exact reason (division by zero, out-of-bounds index, ...) without
/// string inspection.
///
/// # Error Categories
///
/// ## Graph Errors
/// - [`Error::Empty`] - The diagram contains no nodes
/// - [`Error::NoEntry`] - No `Start` node exists
/// - [`Error::MultipleEntries`] - More than one `Start` node exists
/// - [`Error::DuplicateNode`] - Two nodes share an id
/// - [`Error::GraphError`] - Generic graph construction failure
///
/// ## Expression Errors
/// - [`Error::Parse`] - Token sequence could not be parsed
/// - [`Error::Eval`] - Typed evaluation failed
/// - [`Error::InvalidVariable`] - Variable violates its declaration invariants
///
/// ## Runtime Errors
/// - [`Error::InputExhausted`] - An `Input` node found no pending input
/// - [`Error::StepLimit`] - Execution exceeded its configured step budget
///
/// # Examples
///
/// ```rust
/// use flowscope::{expression::EvalError, Error};
///
/// fn describe(err: &Error) -> &'static str {
///     match err {
///         Error::Eval(EvalError::DivisionByZero) => "divide by zero",
///         Error::NoEntry => "missing start",
///         _ => "other",
///     }
/// }
///
/// assert_eq!(describe(&Error::NoEntry), "missing start");
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The flowchart has no nodes at all.
    #[error("Empty flowchart")]
    Empty,

    /// The flowchart has no `Start` node.
    #[error("Flowchart has no start node")]
    NoEntry,

    /// The flowchart has more than one `Start` node.
    ///
    /// The associated value is the number of start nodes found.
    #[error("Flowchart has {0} start nodes, expected exactly one")]
    MultipleEntries(usize),

    /// Two nodes were declared with the same id.
    #[error("Duplicate node id '{0}'")]
    DuplicateNode(String),

    /// Generic graph construction or traversal failure.
    #[error("{0}")]
    GraphError(String),

    /// A variable violates the invariants of its declaration.
    #[error("Invalid variable '{name}': {reason}")]
    InvalidVariable {
        /// Name of the offending variable
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// A token sequence could not be parsed into an expression tree.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// An expression tree could not be evaluated.
    #[error("Evaluation error: {0}")]
    Eval(#[from] EvalError),

    /// An `Input` node was reached with no pending input left.
    #[error("No input available for variable '{0}'")]
    InputExhausted(String),

    /// Execution did not finish within the configured step budget.
    #[error("Execution exceeded {0} steps")]
    StepLimit(usize),

    /// Diagram (de)serialization failed.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}
