//! B-tree index implementation.
//!
//! # Components
//! - [`BTree`] - Owns the root and handles root splits
//! - [`Node`] - Ordered keys plus owned children; search, traversal, splits
//! - [`SharedBTree`] - A `BTree` behind one reader-writer lock
//! - [`BTreeStats`] - Operation counters
//!
//! # Insertion
//! Insertion is single-pass and top-down. Any full node met on the way
//! down is split before the descent enters it, so a split never has to
//! propagate back up. The root is the only node without a parent to take
//! a median; when it is full, a new empty root is placed above it first,
//! which is the only way the tree grows taller.

mod node;
mod shared;
mod stats;
mod tree;

pub use node::{Node, SearchHit};
pub use shared::SharedBTree;
pub use stats::{BTreeStats, StatsSnapshot};
pub use tree::{BTree, Iter};
