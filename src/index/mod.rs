//! Index structures.
//!
//! - [`btree`] - In-memory B-tree over integer keys

pub mod btree;
