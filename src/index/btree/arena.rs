//! Node arena: owns every node of a tree.
//!
//! Nodes refer to each other by [`NodeId`] only. The child list of a node is
//! the ownership edge; the parent id is a plain back-reference used while a
//! split climbs towards the root.

use std::sync::atomic::Ordering;

use tracing::{debug, trace};

use crate::common::NodeId;
use crate::index::btree::{Entry, Node, TreeStats};

/// Fixed-shape storage for tree nodes.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │                    NodeArena                     │
/// │  slots: Vec<Option<Node>>                        │
/// │   [Node0] [None] [Node2] [Node3] ...             │
/// │  free_list: Vec<NodeId>   (LIFO, reused first)   │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// A slot is `None` once its node has been split and discarded.
#[derive(Debug)]
pub struct NodeArena<V> {
    slots: Vec<Option<Node<V>>>,
    free_list: Vec<NodeId>,
    max_keys: usize,
}

impl<V> NodeArena<V> {
    /// Create an empty arena whose nodes hold at most `max_keys` keys.
    pub fn new(max_keys: usize) -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            max_keys,
        }
    }

    /// Maximum keys per node once a split has completed.
    #[inline]
    pub fn max_keys(&self) -> usize {
        self.max_keys
    }

    // ========================================================================
    // Slot management
    // ========================================================================

    /// Allocate a fresh, empty node.
    pub fn allocate(&mut self) -> NodeId {
        let node = Node::new(self.max_keys);
        match self.free_list.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Discard a node and make its slot available again.
    ///
    /// The node must already be detached from its parent.
    pub fn release(&mut self, id: NodeId) {
        if self.slots[id.0].take().is_some() {
            self.free_list.push(id);
        }
    }

    /// Borrow a live node.
    ///
    /// # Panics
    /// Panics if `id` was released. Ids handed out by the tree never are.
    pub fn get(&self, id: NodeId) -> &Node<V> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("{} is not a live node", id),
        }
    }

    /// Borrow a node if `id` refers to a live slot.
    pub fn try_get(&self, id: NodeId) -> Option<&Node<V>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Mutably borrow a live node.
    ///
    /// # Panics
    /// Panics if `id` was released.
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<V> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("{} is not a live node", id),
        }
    }

    /// Number of live nodes.
    pub fn live_count(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    // ========================================================================
    // Child management
    // ========================================================================

    /// Attach `child` under `parent`.
    ///
    /// Sets the child's parent back-reference, appends it, and moves it left
    /// past every sibling whose leading key is larger.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId) {
        self.get_mut(child).set_parent(Some(parent));
        self.get_mut(parent).children_mut().push(child);

        let mut j = self.get(parent).child_count() - 1;
        while j > 0 {
            let prev = self.get(parent).child(j - 1);
            if self.get(prev).leading_key() <= self.get(child).leading_key() {
                break;
            }
            self.get_mut(parent).children_mut().swap(j - 1, j);
            j -= 1;
        }
    }

    /// Detach `child` from `parent` by identity, closing the gap.
    ///
    /// Returns `false` if `child` was not one of `parent`'s children. The
    /// child's own parent link is left for the caller to overwrite or drop.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = self.get_mut(parent).children_mut();
        match children.iter().position(|&id| id == child) {
            Some(pos) => {
                children.remove(pos);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Split
    // ========================================================================

    /// Split an overflowing node, climbing towards the root while parents
    /// overflow in turn.
    ///
    /// Each step divides the node around its median entry (index `len / 2`,
    /// so the left half is the smaller one when the count is even), promotes
    /// the median into the parent, and replaces the node with the two
    /// halves. The climb stops at the first parent that still fits, or at
    /// the root.
    ///
    /// Returns the new root if the climb split the old root, `None`
    /// otherwise.
    pub fn split(&mut self, id: NodeId, stats: &TreeStats) -> Option<NodeId> {
        let mut current = id;

        loop {
            let (promoted, left, right, parent) = self.split_node(current);
            stats.splits.fetch_add(1, Ordering::Relaxed);

            let Some(parent) = parent else {
                let root = self.allocate();
                self.get_mut(root).insert(promoted);
                self.insert_child(root, left);
                self.insert_child(root, right);
                self.release(current);

                stats.root_splits.fetch_add(1, Ordering::Relaxed);
                debug!(old_root = %current, new_root = %root, "split reached root");
                return Some(root);
            };

            self.get_mut(parent).insert(promoted);
            self.remove_child(parent, current);
            self.insert_child(parent, left);
            self.insert_child(parent, right);
            self.release(current);

            if self.get(parent).key_count() <= self.max_keys {
                return None;
            }
            current = parent;
        }
    }

    /// Move the contents of `id` into two new siblings.
    ///
    /// Returns `(promoted, left, right, parent)`. The siblings are not yet
    /// attached to anything and `id` is left empty but still allocated.
    fn split_node(&mut self, id: NodeId) -> (Entry<V>, NodeId, NodeId, Option<NodeId>) {
        let node = self.get_mut(id);
        let parent = node.parent();
        let (mut entries, mut children) = node.take_contents();

        let median = entries.len() / 2;
        let right_entries = entries.split_off(median + 1);
        let promoted = entries.remove(median);
        let left_entries = entries;

        let right_children = if children.is_empty() {
            Vec::new()
        } else {
            children.split_off(median + 1)
        };
        let left_children = children;

        trace!(
            node = %id,
            promoted = promoted.key(),
            left_keys = left_entries.len(),
            right_keys = right_entries.len(),
            "split node"
        );

        let left = self.build_sibling(left_entries, left_children);
        let right = self.build_sibling(right_entries, right_children);

        (promoted, left, right, parent)
    }

    fn build_sibling(&mut self, entries: Vec<Entry<V>>, children: Vec<NodeId>) -> NodeId {
        let sibling = self.allocate();
        for entry in entries {
            self.get_mut(sibling).insert(entry);
        }
        for child in children {
            self.insert_child(sibling, child);
        }
        sibling
    }
}
