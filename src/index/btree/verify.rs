//! Structural verification.
//!
//! Walks the whole tree and checks every invariant the insert path is
//! supposed to maintain. Used by tests and available to callers who want to
//! audit a tree after a bulk load.

use crate::common::{Error, NodeId, Result};
use crate::index::btree::OrderedTree;

/// A node waiting to be checked, with the exclusive key bounds its
/// subtree must respect.
struct Pending<'a> {
    id: NodeId,
    parent: Option<NodeId>,
    lower: Option<&'a str>,
    upper: Option<&'a str>,
    depth: usize,
}

impl<V> OrderedTree<V> {
    /// Check the tree's structural invariants.
    ///
    /// Verifies that:
    /// - keys in every node are strictly ascending
    /// - every key in child `i` lies strictly between keys `i-1` and `i`
    ///   of its parent
    /// - internal nodes have one more child than keys
    /// - every child's parent back-reference points at its parent
    /// - no node holds more than `2·order` keys, and no non-root node fewer
    ///   than `order`
    /// - every leaf sits at depth `height()`
    /// - the entry count equals `size()` and every live node is reachable
    ///
    /// # Errors
    /// - `Error::Corrupted` describing the first violation found
    pub fn verify(&self) -> Result<()> {
        let arena = self.arena();
        let config = self.config();
        let root = self.root_id();

        let mut entries = 0usize;
        let mut visited = 0usize;
        let mut stack = vec![Pending {
            id: root,
            parent: None,
            lower: None,
            upper: None,
            depth: 0,
        }];

        while let Some(pending) = stack.pop() {
            let id = pending.id;
            let node = arena
                .try_get(id)
                .ok_or_else(|| corrupted(format!("{} is referenced but not live", id)))?;

            if node.parent() != pending.parent {
                return Err(corrupted(format!(
                    "{} has parent {:?}, expected {:?}",
                    id,
                    node.parent(),
                    pending.parent
                )));
            }

            let count = node.key_count();
            if count > config.max_keys() {
                return Err(corrupted(format!(
                    "{} holds {} keys, capacity is {}",
                    id,
                    count,
                    config.max_keys()
                )));
            }
            if id != root && count < config.order() {
                return Err(corrupted(format!(
                    "{} holds {} keys, minimum is {}",
                    id,
                    count,
                    config.order()
                )));
            }
            if id == root && self.height() > 0 && count == 0 {
                return Err(corrupted("internal root holds no keys".to_string()));
            }

            let keys: Vec<&str> = node.keys().collect();
            if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
                return Err(corrupted(format!(
                    "{} keys out of order: {:?} before {:?}",
                    id, pair[0], pair[1]
                )));
            }
            if let (Some(lower), Some(first)) = (pending.lower, keys.first()) {
                if *first <= lower {
                    return Err(corrupted(format!(
                        "{} key {:?} not above bound {:?}",
                        id, first, lower
                    )));
                }
            }
            if let (Some(upper), Some(last)) = (pending.upper, keys.last()) {
                if *last >= upper {
                    return Err(corrupted(format!(
                        "{} key {:?} not below bound {:?}",
                        id, last, upper
                    )));
                }
            }

            if node.is_leaf() {
                if pending.depth != self.height() {
                    return Err(corrupted(format!(
                        "leaf {} at depth {}, height is {}",
                        id,
                        pending.depth,
                        self.height()
                    )));
                }
            } else {
                if node.child_count() != count + 1 {
                    return Err(corrupted(format!(
                        "{} has {} keys but {} children",
                        id,
                        count,
                        node.child_count()
                    )));
                }
                for (i, &child) in node.children().iter().enumerate() {
                    stack.push(Pending {
                        id: child,
                        parent: Some(id),
                        lower: if i == 0 { pending.lower } else { Some(keys[i - 1]) },
                        upper: keys.get(i).copied().or(pending.upper),
                        depth: pending.depth + 1,
                    });
                }
            }

            entries += count;
            visited += 1;
        }

        if entries != self.size() {
            return Err(corrupted(format!(
                "found {} entries, size is {}",
                entries,
                self.size()
            )));
        }
        if visited != arena.live_count() {
            return Err(corrupted(format!(
                "reached {} nodes, arena holds {}",
                visited,
                arena.live_count()
            )));
        }

        Ok(())
    }
}

fn corrupted(message: String) -> Error {
    Error::Corrupted(message)
}
