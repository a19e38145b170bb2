//! Control-flow graph construction and loop analysis for flowcharts.
//!
//! - [`FlowCfg`] - validated graph over flowchart nodes with lazy analyses
//! - [`CfgEdgeKind`] - fall-through, yes and no edges
//! - [`LoopForest`] / [`LoopRegion`] - natural loops found from back edges

mod edge;
mod graph;
mod loops;

pub use edge::CfgEdgeKind;
pub use graph::FlowCfg;
pub use loops::{detect_loops, LoopExit, LoopForest, LoopRegion, LoopType};
