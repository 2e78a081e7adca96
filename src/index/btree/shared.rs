//! Lock-guarded B-tree handle for use across threads.

use parking_lot::RwLock;

use crate::common::{Degree, Key, Result};
use crate::index::btree::{BTree, StatsSnapshot};

/// A [`BTree`] behind a single reader-writer lock.
///
/// A convenience for callers that share one tree across threads.
/// [`BTree`] has no concurrency support of its own: it is `&mut`-only for
/// mutation, and callers must serialize access themselves. This wrapper
/// is that caller-side serialization, one lock per tree, and nothing more.
/// It adds no lock-free paths and no per-node locking.
///
/// Writers are serialized and readers run side by side. Every call holds
/// the lock for its whole duration, so no caller ever sees a
/// half-finished split.
///
/// # Thread Safety
/// - `insert`: exclusive (write lock)
/// - `contains`, `traverse`, `len`: shared (read lock)
///
/// # Example
/// ```
/// use ordex::SharedBTree;
/// use std::sync::Arc;
/// use std::thread;
///
/// let tree = Arc::new(SharedBTree::new(3).unwrap());
/// let handles: Vec<_> = (0..4)
///     .map(|i| {
///         let tree = Arc::clone(&tree);
///         thread::spawn(move || {
///             for k in 0..100 {
///                 tree.insert(i * 100 + k);
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
/// assert_eq!(tree.len(), 400);
/// ```
#[derive(Debug)]
pub struct SharedBTree {
    tree: RwLock<BTree>,
}

impl SharedBTree {
    /// Create an empty shared tree with minimum degree `t`.
    ///
    /// # Errors
    /// - `Error::InvalidDegree` if `t < 2`
    pub fn new(t: usize) -> Result<Self> {
        Ok(Self::from(BTree::new(t)?))
    }

    /// Create an empty shared tree with an already validated degree.
    pub fn with_degree(degree: Degree) -> Self {
        Self::from(BTree::with_degree(degree))
    }

    /// Insert `key`. Returns `false` if it was already present.
    pub fn insert(&self, key: Key) -> bool {
        self.tree.write().insert(key)
    }

    /// Check if `key` is stored.
    pub fn contains(&self, key: Key) -> bool {
        self.tree.read().contains(key)
    }

    /// All keys in ascending order.
    pub fn traverse(&self) -> Vec<Key> {
        self.tree.read().traverse()
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    /// Check if the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    /// Snapshot of the tree's counters.
    pub fn stats(&self) -> StatsSnapshot {
        self.tree.read().stats().snapshot()
    }

    /// Run `f` with shared access to the tree.
    ///
    /// Use this for anything that borrows from the tree, such as
    /// [`BTree::search`] hits or [`BTree::iter`].
    pub fn read<R>(&self, f: impl FnOnce(&BTree) -> R) -> R {
        f(&self.tree.read())
    }

    /// Run `f` with exclusive access to the tree.
    pub fn write<R>(&self, f: impl FnOnce(&mut BTree) -> R) -> R {
        f(&mut self.tree.write())
    }

    /// Unwrap the inner tree.
    pub fn into_inner(self) -> BTree {
        self.tree.into_inner()
    }
}

impl From<BTree> for SharedBTree {
    fn from(tree: BTree) -> Self {
        Self {
            tree: RwLock::new(tree),
        }
    }
}

impl Default for SharedBTree {
    fn default() -> Self {
        Self::from(BTree::default())
    }
}
