//! Control-flow analysis of flowcharts.
//!
//! This module turns a flowchart into a [`FlowCfg`] and recovers its loop structure. It builds
//! on the generic graph layer in [`crate::utils::graph`]; the code generator reads everything it
//! needs about dominance and loops from here.
//!
//! # Usage
//!
//! ```rust
//! use flowscope::{
//!     analysis::{FlowCfg, LoopType},
//!     flowchart::DiagramBuilder,
//!     expression::{Element, Expression, Operator, Variable, VariableType},
//! };
//!
//! let x = Variable::scalar("x", "x", VariableType::Integer);
//! let test = Expression::condition(
//!     vec![Element::var(&x)],
//!     Operator::Greater,
//!     vec![Element::literal("0")],
//! );
//! let diagram = DiagramBuilder::new()
//!     .start("s")
//!     .conditional("c", test)
//!     .end("e")
//!     .edge("s", "c")
//!     .yes("c", "c")
//!     .no("c", "e")
//!     .build();
//!
//! let cfg = FlowCfg::build(&diagram.nodes, &diagram.edges)?;
//! let header = cfg.node_id("c").unwrap();
//! let region = cfg.loops().loop_for_header(header).unwrap();
//! assert_eq!(region.loop_type, LoopType::PreTested);
//! # Ok::<(), flowscope::Error>(())
//! ```

pub mod cfg;

pub use cfg::{CfgEdgeKind, FlowCfg, LoopExit, LoopForest, LoopRegion, LoopType};
