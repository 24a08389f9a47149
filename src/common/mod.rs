//! Common types and utilities shared across the crate.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration (order, node capacity)
//! - Error types
//! - Identifiers (NodeId)

pub mod config;
pub mod error;
mod node_id;

pub use config::{TreeConfig, DEFAULT_ORDER};
pub use error::{Error, Result};
pub use node_id::NodeId;
