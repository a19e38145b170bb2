//! Shared low-level utilities.
//!
//! - [`BitSet`] - dense index sets used by the graph analyses
//! - [`escape_dot`] - label escaping for Graphviz output
//! - [`graph`] - generic directed graph, traversal traits and algorithms

mod bitset;
mod dot;
pub mod graph;

pub use bitset::{BitSet, BitSetIter};
pub use dot::escape_dot;
