//! Configuration for the ordered tree.

use crate::common::{Error, Result};

/// Order used when none is given.
///
/// Matches the fan-out the bulk insert harness was tuned against:
/// - 8 keys per node
/// - 9 children per internal node
pub const DEFAULT_ORDER: usize = 4;

/// Validated tree configuration.
///
/// The order `O` fixes the node capacity:
/// - max keys per node = 2·O
/// - max children per node = 2·O + 1
///
/// Each node reserves one extra key slot (and one extra child slot) so an
/// insert can overflow it before the split runs.
///
/// # Example
/// ```
/// use orderedtree::TreeConfig;
///
/// let config = TreeConfig::new(2).unwrap();
/// assert_eq!(config.max_keys(), 4);
/// assert_eq!(config.max_children(), 5);
///
/// assert!(TreeConfig::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    order: usize,
}

impl TreeConfig {
    /// Create a configuration for the given order.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order` is 0
    pub fn new(order: usize) -> Result<Self> {
        if order == 0 {
            return Err(Error::InvalidOrder(order));
        }
        Ok(Self { order })
    }

    /// The configured order.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Maximum number of keys a node holds once an insert returns.
    #[inline]
    pub fn max_keys(&self) -> usize {
        2 * self.order
    }

    /// Maximum number of children of an internal node.
    #[inline]
    pub fn max_children(&self) -> usize {
        self.max_keys() + 1
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
        }
    }
}
