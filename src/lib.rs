//! orderedtree - An ordered string-keyed map backed by a B-tree.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          OrderedTree                            │
//! │        insert / find / size / height / levels / verify          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                  NodeArena (index/btree)                 │   │
//! │  │   slots: [Node0] [Node1] [Node2] ...   free_list         │   │
//! │  │   insert_child / remove_child / split (climbs to root)   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                          Node                            │   │
//! │  │   entries: sorted (key, value)   children: NodeId        │   │
//! │  │   parent: Option<NodeId>  (back-reference, not owning)   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Error, config)
//! - [`index`] - The B-tree itself
//!
//! # Quick Start
//! ```
//! use orderedtree::OrderedTree;
//!
//! let mut tree = OrderedTree::new(4);
//! tree.insert("apple", 3).unwrap();
//! tree.insert("pear", 5).unwrap();
//!
//! assert_eq!(*tree.find("pear").unwrap(), 5);
//! assert!(tree.find("plum").is_err());
//! assert_eq!(tree.size(), 2);
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::DEFAULT_ORDER;
pub use common::{Error, NodeId, Result, TreeConfig};

pub use index::btree::{Entry, OrderedTree, SharedTree, StatsSnapshot, TreeStats};
