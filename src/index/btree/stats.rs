//! Tree statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics tracked by the tree.
///
/// Counters are atomic so that lookups, which only borrow the tree, can
/// still record into them. A tree shared through a read lock can bump
/// them from several threads at once.
///
/// # Memory Ordering
/// `Ordering::Relaxed` everywhere: counters are independent and only need
/// to be atomic, not ordered relative to each other.
///
/// # Example
/// ```
/// use orderedtree::TreeStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = TreeStats::new();
/// stats.splits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().splits, 1);
/// ```
#[derive(Debug)]
pub struct TreeStats {
    /// Number of node splits, at any level.
    pub splits: AtomicU64,

    /// Number of splits that created a new root.
    ///
    /// Equal to the tree height, since nothing ever shrinks the tree.
    pub root_splits: AtomicU64,

    /// Number of inserts rejected because the key was already present.
    pub duplicate_rejections: AtomicU64,

    /// Number of `find` calls.
    pub lookups: AtomicU64,

    /// Number of `find` calls that did not find their key.
    pub failed_lookups: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            splits: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
            duplicate_rejections: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
            failed_lookups: AtomicU64::new(0),
        }
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            splits: self.splits.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            duplicate_rejections: self.duplicate_rejections.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
            failed_lookups: self.failed_lookups.load(Ordering::Relaxed),
        }
    }

    /// Reset the lookup and rejection counters.
    ///
    /// Split counters describe the tree's shape and are kept.
    pub fn reset_access_counters(&self) {
        self.duplicate_rejections.store(0, Ordering::Relaxed);
        self.lookups.store(0, Ordering::Relaxed);
        self.failed_lookups.store(0, Ordering::Relaxed);
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`TreeStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub splits: u64,
    pub root_splits: u64,
    pub duplicate_rejections: u64,
    pub lookups: u64,
    pub failed_lookups: u64,
}

impl StatsSnapshot {
    /// Fraction of lookups that missed (0.0 to 1.0).
    pub fn miss_rate(&self) -> f64 {
        if self.lookups == 0 {
            0.0
        } else {
            self.failed_lookups as f64 / self.lookups as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ splits: {}, root_splits: {}, duplicates: {}, lookups: {}, miss_rate: {:.2}% }}",
            self.splits,
            self.root_splits,
            self.duplicate_rejections,
            self.lookups,
            self.miss_rate() * 100.0
        )
    }
}
