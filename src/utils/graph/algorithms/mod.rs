//! Graph algorithms used by the control-flow analyses.
//!
//! ## Traversal
//!
//! - [`bfs`] - breadth-first iteration
//! - [`bfs_distances`] - breadth-first distances inside a node filter
//! - [`postorder`] / [`reverse_postorder`] - depth-first orders
//! - [`reachable`] - reachability set from a start node
//!
//! ## Dominance
//!
//! - [`compute_dominators`] - iterative dominator-set fixed point
//! - [`DominatorSets`] - the resulting per-node sets
//!
//! | Algorithm | Time Complexity |
//! |-----------|-----------------|
//! | BFS / DFS orders | O(V + E) |
//! | Dominator sets | O(V · E · V/64) worst case, a few sweeps in practice |

mod dominators;
mod traversal;

pub use dominators::{compute_dominators, DominatorSets};
pub use traversal::{bfs, bfs_distances, postorder, reachable, reverse_postorder, BfsIterator};
