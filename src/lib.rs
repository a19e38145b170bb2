// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # flowscope
//!
//! A compiler from flowcharts to structured source code, together with the typed expression
//! engine that evaluates the flowchart's expressions.
//!
//! A flowchart is a directed graph of typed blocks (start, end, declare, assign, input, output,
//! conditional) connected by plain or `yes`/`no` labeled edges. `flowscope` builds a
//! control-flow graph from it, recovers `if`/`else`, `while` and `break` structure through
//! dominance and natural-loop analysis, and renders a small Python-like program with a
//! provenance comment pointing back at each originating block.
//!
//! ## Features
//!
//! - **Structured synthesis** - pre-tested, post-tested and infinite loops, reconverging and
//!   tail-duplicated branches, best-effort `Unsupported` markers instead of hard failures
//! - **Typed expressions** - recursive-descent parser and evaluator over integers, floats,
//!   strings, booleans and fixed-size arrays, with cast builtins and checked arithmetic
//! - **Stepped execution** - run a flowchart one block at a time with copy-on-write bindings
//! - **Graph analysis** - reusable dominator sets, traversal orders and loop forests over any
//!   graph implementing the traversal traits
//!
//! ## Quick Start
//!
//! ```rust
//! use flowscope::prelude::*;
//!
//! let x = Variable::scalar("x", "x", VariableType::Integer);
//! let diagram = DiagramBuilder::new()
//!     .start("s")
//!     .declare("d", vec![x.clone()])
//!     .assign("a", Expression::assignment(x.clone(), vec![Element::literal("2")]))
//!     .output("o", Expression::value(vec![Element::var(&x)]))
//!     .end("e")
//!     .chain(&["s", "d", "a", "o", "e"])
//!     .build();
//!
//! let compilation = compile(&diagram.nodes, &diagram.edges);
//! assert!(compilation.text.contains("x = 2\n"));
//! assert!(compilation.text.contains("print(x)\n"));
//!
//! let mut execution = Execution::new(&diagram.nodes, &diagram.edges, ExecutionConfig::default())?;
//! execution.run(&mut ScriptedInput::default())?;
//! assert_eq!(execution.outputs(), ["2"]);
//! # Ok::<(), flowscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`flowchart`] - the diagram model consumed from an editor, with serde support
//! - [`expression`] - tokens, parser, typed evaluator and assignment engine
//! - [`analysis`] - control-flow graph and loop detection over flowcharts
//! - [`codegen`] - structured synthesis and text emission
//! - [`runtime`] - node-by-node execution
//! - [`utils`] - bit sets, DOT escaping and the generic graph layer
//!
//! ## Error Handling
//!
//! Fallible operations return [`Result`], whose error type [`Error`] keeps the typed
//! [`expression::ParseError`] and [`expression::EvalError`] reasons of expression failures.
//! Compilation itself never fails; structural problems surface as `Unsupported` statements.

mod error;

#[cfg(test)]
mod test;

/// Convenient re-exports of the most used types.
///
/// # Example
///
/// ```rust
/// use flowscope::prelude::*;
///
/// let options = CompileOptions::default();
/// assert_eq!(options.emitter.indent_width, 2);
/// ```
pub mod prelude;

/// Control-flow graph construction, dominance and loop analysis for flowcharts.
pub mod analysis;

/// Flowchart compilation into a structured program and its text.
pub mod codegen;

/// Typed expressions: tokens, parsing, evaluation and assignment.
pub mod expression;

/// The flowchart model: nodes, edges and the diagram container.
pub mod flowchart;

/// Step-by-step flowchart execution.
pub mod runtime;

/// Low-level utilities shared by the analyses.
pub mod utils;

/// The crate-wide error type.
///
/// # Example
///
/// ```rust
/// use flowscope::{analysis::FlowCfg, Error};
///
/// match FlowCfg::build(&[], &[]) {
///     Err(Error::Empty) => {}
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub use error::Error;

/// `Result` with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;
