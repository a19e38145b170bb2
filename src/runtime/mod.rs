//! Node-by-node execution of flowcharts.
//!
//! [`Execution`] owns a [`FlowCfg`](crate::analysis::FlowCfg) built from the diagram and runs one
//! node per [`Execution::step`], the same way a step-through debugger would. Each step returns a
//! [`StepEvent`] describing what happened; bindings are replaced by a new snapshot on every
//! write, so a caller may keep older snapshots for history views.
//!
//! Input nodes pull lines from an [`InputSource`]. [`ScriptedInput`] replays a fixed list.
//!
//! # Examples
//!
//! ```rust
//! use flowscope::{
//!     expression::{Element, Expression, Operator, Variable, VariableType},
//!     flowchart::DiagramBuilder,
//!     runtime::{Execution, ExecutionConfig, ScriptedInput},
//! };
//!
//! let n = Variable::scalar("n", "n", VariableType::Integer);
//! let double = Expression::value(vec![
//!     Element::var(&n),
//!     Element::op(Operator::Multiply),
//!     Element::literal("2"),
//! ]);
//! let diagram = DiagramBuilder::new()
//!     .start("s")
//!     .input("i", n.clone())
//!     .output("o", double)
//!     .end("e")
//!     .chain(&["s", "i", "o", "e"])
//!     .build();
//!
//! let mut execution = Execution::new(&diagram.nodes, &diagram.edges, ExecutionConfig::default())?;
//! execution.run(&mut ScriptedInput::new(["21"]))?;
//! assert_eq!(execution.outputs(), ["42"]);
//! # Ok::<(), flowscope::Error>(())
//! ```

mod config;
mod execution;
mod input;

pub use config::ExecutionConfig;
pub use execution::{Execution, StepEvent};
pub use input::{InputSource, ScriptedInput};
