//! Error types for the ordered tree.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the tree.
///
/// `DuplicateKey` and `NotFound` are the only errors the map operations
/// produce. Both leave the tree untouched, so the caller can carry on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Insert of a key that is already stored somewhere in the tree.
    #[error("Keys must be unique: {0} already present")]
    DuplicateKey(String),

    /// Lookup of a key that is not stored in the tree.
    #[error("Element with key {0} does not exist")]
    NotFound(String),

    /// The tree order must be a positive integer.
    #[error("Invalid tree order: {0} (must be > 0)")]
    InvalidOrder(usize),

    /// A structural invariant does not hold.
    ///
    /// Only reported by `OrderedTree::verify`. Indicates a bug.
    #[error("Tree corrupted: {0}")]
    Corrupted(String),
}
