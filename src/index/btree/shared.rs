//! Thread-shareable handle to a tree.
//!
//! The tree itself is single-threaded. [`SharedTree`] serializes access with
//! a reader-writer lock so one tree can be handed to several threads.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::common::{Result, TreeConfig};
use crate::index::btree::{OrderedTree, StatsSnapshot};

/// A cloneable, lock-protected [`OrderedTree`].
///
/// # Thread Safety
/// - `insert`: write lock, one writer at a time
/// - `find`, `size`, `height`, `stats`: read lock, many readers
///
/// `find` returns a clone of the value because the read lock is released
/// before the call returns.
///
/// # Example
/// ```
/// use orderedtree::SharedTree;
/// use std::thread;
///
/// let tree = SharedTree::new(4);
/// let writer = tree.clone();
/// thread::spawn(move || writer.insert("k", 1).unwrap())
///     .join()
///     .unwrap();
///
/// assert_eq!(tree.find("k").unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct SharedTree<V> {
    inner: Arc<RwLock<OrderedTree<V>>>,
}

impl<V> SharedTree<V> {
    /// Create an empty shared tree of the given order.
    ///
    /// # Panics
    /// Panics if `order` is 0.
    pub fn new(order: usize) -> Self {
        Self::from_tree(OrderedTree::new(order))
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self::from_tree(OrderedTree::with_config(config))
    }

    /// Wrap an existing tree.
    pub fn from_tree(tree: OrderedTree<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Insert under the write lock.
    ///
    /// # Errors
    /// - `Error::DuplicateKey` if `key` is already stored
    pub fn insert(&self, key: impl Into<String>, value: V) -> Result<()> {
        self.inner.write().insert(key, value)
    }

    /// Look up under the read lock, cloning the value out.
    ///
    /// # Errors
    /// - `Error::NotFound` if `key` is not stored
    pub fn find(&self, key: &str) -> Result<V>
    where
        V: Clone,
    {
        self.inner.read().find(key).cloned()
    }

    pub fn size(&self) -> usize {
        self.inner.read().size()
    }

    pub fn height(&self) -> usize {
        self.inner.read().height()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.read().stats()
    }

    /// Run `f` with shared access to the whole tree.
    pub fn with_read<R>(&self, f: impl FnOnce(&OrderedTree<V>) -> R) -> R {
        f(&self.inner.read())
    }
}

impl<V> Clone for SharedTree<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
