//! Index structures.
//!
//! - [`btree`] - Arena-allocated B-tree keyed by strings

pub mod btree;
