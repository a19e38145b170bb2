//! Generic directed graph infrastructure.
//!
//! The flowchart CFG is a thin layer over [`DirectedGraph`]: node payloads
//! are flowchart nodes, edge payloads are branch kinds. Algorithms in
//! [`algorithms`] only see the capability traits from this module, so they
//! work on any graph that can list successors and predecessors.
//!
//! - [`NodeId`] / [`EdgeId`] - dense, strongly typed indices
//! - [`DirectedGraph`] - adjacency-list storage
//! - [`GraphBase`], [`Successors`], [`Predecessors`], [`RootedGraph`] -
//!   traversal capabilities

mod directed;
mod edge;
mod node;
pub(crate) mod traits;

pub mod algorithms;

pub use directed::DirectedGraph;
pub use edge::EdgeId;
pub use node::NodeId;
pub use traits::{GraphBase, Predecessors, RootedGraph, Successors};
