//! The ordered tree: descent, insertion, and lookup.

use std::fmt;
use std::sync::atomic::Ordering;

use tracing::debug;

use crate::common::{Error, NodeId, Result, TreeConfig};
use crate::index::btree::{Entry, NodeArena, StatsSnapshot, TreeStats};

/// An ordered map from string keys to values, backed by a B-tree.
///
/// Every entry, whether it sits in a leaf or an internal node, is a stored
/// key/value pair. Keys are unique; inserting a key twice is an error and
/// there is no update or delete.
///
/// # Usage
/// ```
/// use orderedtree::{Error, OrderedTree};
///
/// let mut tree = OrderedTree::new(1);
/// tree.insert("b", 2).unwrap();
/// tree.insert("a", 1).unwrap();
/// tree.insert("c", 3).unwrap();
///
/// assert_eq!(tree.find("a"), Ok(&1));
/// assert_eq!(tree.height(), 1);
/// assert!(matches!(tree.insert("a", 9), Err(Error::DuplicateKey(_))));
/// assert!(matches!(tree.find("z"), Err(Error::NotFound(_))));
/// ```
#[derive(Debug)]
pub struct OrderedTree<V> {
    config: TreeConfig,

    /// Owns every node; links between nodes are ids into it.
    arena: NodeArena<V>,

    root: NodeId,

    /// Number of stored entries.
    size: usize,

    /// Edges from the root to any leaf.
    height: usize,

    stats: TreeStats,
}

impl<V> OrderedTree<V> {
    /// Create an empty tree of the given order.
    ///
    /// # Panics
    /// Panics if `order` is 0. Use [`TreeConfig::new`] and
    /// [`OrderedTree::with_config`] to validate an untrusted order.
    pub fn new(order: usize) -> Self {
        match TreeConfig::new(order) {
            Ok(config) => Self::with_config(config),
            Err(_) => panic!("order must be > 0"),
        }
    }

    /// Create an empty tree from a validated configuration.
    pub fn with_config(config: TreeConfig) -> Self {
        let mut arena = NodeArena::new(config.max_keys());
        let root = arena.allocate();

        Self {
            config,
            arena,
            root,
            size: 0,
            height: 0,
            stats: TreeStats::new(),
        }
    }

    // ========================================================================
    // Public API: Insert and find
    // ========================================================================

    /// Insert a new key/value pair.
    ///
    /// Uniqueness is checked at every node on the way down, not only at the
    /// target leaf: a key stored in an internal node on the root-to-leaf
    /// path is reported as soon as that node is visited. Nothing is mutated
    /// before the check passes, so a rejected insert leaves the tree as it
    /// was.
    ///
    /// # Errors
    /// - `Error::DuplicateKey` if `key` is already stored
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Result<()> {
        let key = key.into();

        let leaf = match self.descend_to_leaf(&key) {
            Ok(leaf) => leaf,
            Err(e) => {
                self.stats
                    .duplicate_rejections
                    .fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "rejected duplicate key");
                return Err(e);
            }
        };

        self.arena.get_mut(leaf).insert(Entry::new(key, value));

        if self.arena.get(leaf).key_count() > self.config.max_keys() {
            if let Some(new_root) = self.arena.split(leaf, &self.stats) {
                self.root = new_root;
                self.height += 1;
                debug!(height = self.height, "tree grew");
            }
        }

        self.size += 1;
        Ok(())
    }

    /// Look up the value stored under `key`.
    ///
    /// Stops at the first node holding the key, internal or leaf.
    ///
    /// # Errors
    /// - `Error::NotFound` if `key` is not stored
    pub fn find(&self, key: &str) -> Result<&V> {
        self.stats.lookups.fetch_add(1, Ordering::Relaxed);

        let mut current = self.root;
        loop {
            let node = self.arena.get(current);
            match node.search(key) {
                Ok(slot) => return Ok(node.entry(slot).value()),
                Err(_) if node.is_leaf() => {
                    self.stats.failed_lookups.fetch_add(1, Ordering::Relaxed);
                    return Err(Error::NotFound(key.to_string()));
                }
                Err(slot) => current = node.child(slot),
            }
        }
    }

    /// Whether `key` is stored in the tree.
    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key).is_ok()
    }

    // ========================================================================
    // Public API: Counters
    // ========================================================================

    /// Number of stored entries.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of edges from the root to a leaf. An empty tree has height 0.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Number of nodes currently in the tree.
    pub fn node_count(&self) -> usize {
        self.arena.live_count()
    }

    /// Get a snapshot of split and lookup statistics.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Reset lookup and rejection counters.
    pub fn reset_stats(&self) {
        self.stats.reset_access_counters();
    }

    // ========================================================================
    // Public API: Diagnostics
    // ========================================================================

    /// Keys grouped per node, per level, root level first.
    ///
    /// Nodes within a level are listed left to right.
    pub fn levels(&self) -> Vec<Vec<Vec<&str>>> {
        let mut levels = Vec::with_capacity(self.height + 1);
        let mut frontier = vec![self.root];

        while !frontier.is_empty() {
            let mut level = Vec::with_capacity(frontier.len());
            let mut next = Vec::new();
            for id in frontier {
                let node = self.arena.get(id);
                level.push(node.keys().collect());
                next.extend_from_slice(node.children());
            }
            levels.push(level);
            frontier = next;
        }

        levels
    }

    pub(crate) fn arena(&self) -> &NodeArena<V> {
        &self.arena
    }

    #[cfg(test)]
    pub(crate) fn arena_mut(&mut self) -> &mut NodeArena<V> {
        &mut self.arena
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Follow the routing rule from the root to the leaf where `key` belongs,
    /// checking each visited node for the key.
    fn descend_to_leaf(&self, key: &str) -> Result<NodeId> {
        let mut current = self.root;
        loop {
            let node = self.arena.get(current);
            match node.search(key) {
                Ok(_) => return Err(Error::DuplicateKey(key.to_string())),
                Err(_) if node.is_leaf() => return Ok(current),
                Err(slot) => current = node.child(slot),
            }
        }
    }
}

impl<V> Default for OrderedTree<V> {
    fn default() -> Self {
        Self::with_config(TreeConfig::default())
    }
}

/// Level-by-level key dump.
///
/// ```text
/// Level 1: [d]
/// Level 2: [b] [f h]
/// Level 3: [a] [c] [e] [g] [i j]
/// ```
impl<V> fmt::Display for OrderedTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, level) in self.levels().iter().enumerate() {
            write!(f, "Level {}:", depth + 1)?;
            for keys in level {
                write!(f, " [{}]", keys.join(" "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(order: usize, keys: &[&str]) -> OrderedTree<usize> {
        let mut tree = OrderedTree::new(order);
        for (i, key) in keys.iter().enumerate() {
            tree.insert(*key, i).unwrap();
        }
        tree
    }

    #[test]
    fn test_empty_tree() {
        let tree: OrderedTree<u32> = OrderedTree::new(2);
        assert_eq!(tree.size(), 0);
        assert_eq!(tree.height(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.find("a"), Err(Error::NotFound("a".to_string())));
    }

    #[test]
    #[should_panic(expected = "order must be > 0")]
    fn test_zero_order_panics() {
        let _tree: OrderedTree<u32> = OrderedTree::new(0);
    }

    #[test]
    fn test_single_leaf_root_find() {
        let tree = tree_with(2, &["m", "c", "x"]);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.find("c"), Ok(&1));
        assert_eq!(tree.find("x"), Ok(&2));
        assert!(tree.find("d").is_err());
    }

    #[test]
    fn test_order_one_example() {
        let mut tree = tree_with(1, &["b", "a"]);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.levels(), vec![vec![vec!["a", "b"]]]);

        tree.insert("c", 2).unwrap();

        assert_eq!(tree.height(), 1);
        assert_eq!(
            tree.levels(),
            vec![vec![vec!["b"]], vec![vec!["a"], vec!["c"]]]
        );
        assert_eq!(tree.find("a"), Ok(&1));
        assert_eq!(tree.find("b"), Ok(&0));
        assert_eq!(tree.find("z"), Err(Error::NotFound("z".to_string())));
    }

    #[test]
    fn test_duplicate_in_leaf_root() {
        let mut tree = tree_with(2, &["a"]);
        assert_eq!(
            tree.insert("a", 7),
            Err(Error::DuplicateKey("a".to_string()))
        );
        assert_eq!(tree.size(), 1);
        assert_eq!(tree.find("a"), Ok(&0));
    }

    #[test]
    fn test_duplicate_in_internal_node_rejected() {
        let mut tree = tree_with(1, &["b", "a", "c"]);
        let before = tree.to_string();

        // "b" lives in the root now
        assert_eq!(
            tree.insert("b", 9),
            Err(Error::DuplicateKey("b".to_string()))
        );

        assert_eq!(tree.to_string(), before);
        assert_eq!(tree.size(), 3);
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.stats().duplicate_rejections, 1);
    }

    #[test]
    fn test_find_internal_key_returns_its_value() {
        let tree = tree_with(1, &["b", "a", "c"]);
        assert_eq!(tree.find("b"), Ok(&0));
    }

    #[test]
    fn test_alphabet_order_one_shape() {
        let alphabet: Vec<String> = ('a'..='g').map(|c| c.to_string()).collect();
        let keys: Vec<&str> = alphabet.iter().map(String::as_str).collect();
        let tree = tree_with(1, &keys);

        // "g" overflows a leaf and then the full root [b d f]
        assert_eq!(tree.height(), 2);
        assert_eq!(
            tree.levels(),
            vec![
                vec![vec!["d"]],
                vec![vec!["b"], vec!["f"]],
                vec![vec!["a"], vec!["c"], vec!["e"], vec!["g"]],
            ]
        );
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(tree.find(key), Ok(&i));
        }
    }

    #[test]
    fn test_height_matches_root_splits() {
        let mut tree = OrderedTree::new(2);
        for i in 0..500 {
            tree.insert(format!("{:04}", i), i).unwrap();
            assert_eq!(tree.height() as u64, tree.stats().root_splits);
        }
        assert_eq!(tree.size(), 500);
    }

    #[test]
    fn test_display_levels() {
        let tree = tree_with(1, &["b", "a", "c"]);
        assert_eq!(tree.to_string(), "Level 1: [b]\nLevel 2: [a] [c]\n");

        let empty: OrderedTree<u8> = OrderedTree::default();
        assert_eq!(empty.to_string(), "Level 1: []\n");
    }

    #[test]
    fn test_lookup_stats() {
        let tree = tree_with(2, &["a", "b"]);
        let _ = tree.find("a");
        let _ = tree.find("q");
        assert!(!tree.contains_key("r"));

        let stats = tree.stats();
        assert_eq!(stats.lookups, 3);
        assert_eq!(stats.failed_lookups, 2);

        tree.reset_stats();
        assert_eq!(tree.stats().lookups, 0);
    }

    #[test]
    fn test_node_count_tracks_splits() {
        let tree = tree_with(1, &["b", "a", "c"]);
        assert_eq!(tree.node_count(), 3);
    }
}
