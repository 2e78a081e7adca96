//! ordex - An in-memory B-tree ordered index over integer keys.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                             ordex                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │            SharedBTree (index/btree/shared)              │   │
//! │  │          one RwLock per tree, optional wrapper           │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               BTree (index/btree/tree)                   │   │
//! │  │   root ownership + root split │ len │ stats │ validate   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                Node (index/btree/node)                   │   │
//! │  │   search │ traverse │ insert_non_full │ split_child      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                  Common (common/)                        │   │
//! │  │           Key │ Degree │ Error │ config constants        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (Key, Degree, Error, config)
//! - [`index`] - Index structures (B-tree)
//!
//! # Quick Start
//! ```
//! use ordex::BTree;
//!
//! let mut tree = BTree::new(3).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! let keys: Vec<String> = tree.iter().map(|k| k.to_string()).collect();
//! println!("Traversal of the constructed B-tree is: {}", keys.join(" "));
//!
//! for key in [6, 15] {
//!     match tree.search(key) {
//!         Some(_) => println!("{} present", key),
//!         None => println!("{} not present", key),
//!     }
//! }
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_DEGREE, MIN_DEGREE};
pub use common::{Degree, Error, Key, Result};

pub use index::btree::{BTree, BTreeStats, Iter, Node, SearchHit, SharedBTree, StatsSnapshot};
