//! Typed expressions: tokens, parsing, evaluation and assignment.
//!
//! The editor stores expressions as flat sequences of [`Element`]s. This
//! module turns them into [`AstNode`] trees with [`parse`], evaluates those
//! against an immutable [`Bindings`] snapshot with [`evaluate`], and computes
//! the [`Binding`] an assignment produces with [`assign`].
//!
//! The same trees feed the code generator, which lowers them to target
//! expressions without evaluating anything.
//!
//! # Examples
//!
//! ```rust
//! use flowscope::expression::{
//!     assign, evaluate_value, Bindings, Element, Expression, Operator, Value, Variable,
//!     VariableType,
//! };
//!
//! let x = Variable::scalar("x", "x", VariableType::Integer);
//! let set = Expression::assignment(
//!     x.clone(),
//!     vec![Element::literal("2"), Element::op(Operator::Multiply), Element::literal("21")],
//! );
//! let bindings = Bindings::new().with(assign(&set, &Bindings::new())?);
//!
//! let read = Expression::value(vec![Element::var(&x)]);
//! assert_eq!(evaluate_value(&read, None, &bindings)?, Value::Integer(42));
//! # Ok::<(), flowscope::Error>(())
//! ```

mod assign;
mod ast;
mod element;
mod error;
mod evaluator;
mod parser;
mod types;
mod variable;

pub use assign::assign;
pub use ast::{AstNode, BinaryOperator, Identifier, UnaryOperator};
pub use element::{Element, Expression, FunctionName, LeftSide, Operator};
pub use error::{EvalError, ParseError};
pub use evaluator::{calculate_value, cast, coerce, evaluate, evaluate_condition, evaluate_value};
pub use parser::{parse, parse_condition, parse_literal, parse_value};
pub use types::{TypedValue, Value, VariableType};
pub use variable::{Binding, Bindings, Variable};
