//! B-tree backed ordered map.
//!
//! # Components
//! - [`OrderedTree`] - The map: descent, insert, find, counters
//! - [`Node`] / [`Entry`] - Sorted key/value records and child ids
//! - [`NodeArena`] - Owns all nodes; child management and split
//! - [`TreeStats`] - Split and lookup counters
//! - [`SharedTree`] - Lock-protected handle for use across threads
//!
//! # Shape
//! For order `O`, a node holds at most `2·O` keys and an internal node
//! `2·O + 1` children. An insert that pushes a leaf to `2·O + 1` keys splits
//! it; splits climb while parents overflow, and a split of the root adds a
//! level.

mod arena;
mod node;
mod shared;
mod stats;
mod tree;
mod verify;

pub use arena::NodeArena;
pub use node::{Entry, Node};
pub use shared::SharedTree;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::OrderedTree;
