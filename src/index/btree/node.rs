//! Entry and node records.
//!
//! A [`Node`] only knows about its own entries and the ids of its children.
//! Anything that has to look at another node (attaching a child, splitting)
//! lives on [`NodeArena`](super::NodeArena).

use crate::common::NodeId;

/// An immutable key/value pair stored in the tree.
///
/// Entries live in internal nodes as well as in leaves; every entry is a
/// first-class stored pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<V> {
    key: String,
    value: V,
}

impl<V> Entry<V> {
    /// Create a new entry.
    pub fn new(key: impl Into<String>, value: V) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// The entry's key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The entry's value.
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// A node of the tree.
///
/// # Layout
/// ```text
///   entries:  [e0] [e1] ... [e(2·O-1)] [overflow]
///   children: [c0] [c1] ... [c(2·O)]   [overflow]
/// ```
///
/// Both vectors are allocated with one spare slot: an insert may push the
/// node one past its capacity, and the split that follows empties it again.
///
/// # Invariants
/// - `entries` is sorted ascending by key at all times
/// - `children` is sorted ascending by each child's leading key
/// - a leaf has no children; an internal node has `entries.len() + 1`
///   children once any split in progress has finished
/// - `parent` is `None` only for the root
#[derive(Debug)]
pub struct Node<V> {
    entries: Vec<Entry<V>>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl<V> Node<V> {
    /// Create an empty node sized for `max_keys` keys plus the overflow slot.
    pub fn new(max_keys: usize) -> Self {
        Self {
            entries: Vec::with_capacity(max_keys + 1),
            children: Vec::with_capacity(max_keys + 2),
            parent: None,
        }
    }

    /// Insert an entry, keeping the entries sorted.
    ///
    /// The entry is appended and then shifted left past every larger key,
    /// a single insertion-sort step. The caller has already checked that the
    /// key is not present, and is responsible for splitting the node if this
    /// pushed it over capacity.
    pub fn insert(&mut self, entry: Entry<V>) {
        self.entries.push(entry);

        let mut j = self.entries.len() - 1;
        while j > 0 && self.entries[j - 1].key > self.entries[j].key {
            self.entries.swap(j - 1, j);
            j -= 1;
        }
    }

    /// Locate `key` among this node's entries.
    ///
    /// Returns `Ok(slot)` on an exact match. Otherwise returns `Err(i)`, the
    /// routing slot: the child to descend into, where
    /// - `key < k0` gives 0
    /// - `key > k(n-1)` gives n
    /// - `k(i-1) < key < k(i)` gives i
    pub fn search(&self, key: &str) -> Result<usize, usize> {
        self.entries.binary_search_by(|entry| entry.key.as_str().cmp(key))
    }

    /// Whether this node itself stores `key`.
    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.search(key).is_ok()
    }

    #[inline]
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Entry at `index`.
    ///
    /// # Panics
    /// Panics if `index >= key_count()`.
    #[inline]
    pub fn entry(&self, index: usize) -> &Entry<V> {
        &self.entries[index]
    }

    /// Child at `index`.
    ///
    /// # Panics
    /// Panics if `index >= child_count()`.
    #[inline]
    pub fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    pub fn entries(&self) -> &[Entry<V>] {
        &self.entries
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Entry::key)
    }

    /// The smallest key, used to order siblings.
    #[inline]
    pub fn leading_key(&self) -> Option<&str> {
        self.entries.first().map(Entry::key)
    }

    pub(super) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    pub(super) fn children_mut(&mut self) -> &mut Vec<NodeId> {
        &mut self.children
    }

    /// Move the entries and children out, leaving the node empty.
    pub(super) fn take_contents(&mut self) -> (Vec<Entry<V>>, Vec<NodeId>) {
        (
            std::mem::take(&mut self.entries),
            std::mem::take(&mut self.children),
        )
    }
}
