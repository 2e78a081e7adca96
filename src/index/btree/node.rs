//! Node - a bounded, ordered container of keys.
//!
//! A [`Node`] holds up to `2t - 1` keys in strictly ascending order and,
//! when internal, exactly one more child than it has keys:
//!
//! ```text
//!            keys:   [ k0 | k1 | k2 ]
//!                   /    |    |     \
//!   children:    c0     c1    c2     c3
//!
//!   every key in c[i]   <  k[i]
//!   every key in c[i+1] >  k[i]
//! ```
//!
//! Nodes own their children directly, so dropping a node drops its whole
//! subtree. Only the owning [`BTree`](super::BTree) mutates nodes.

use tracing::trace;

use crate::common::{Degree, Key};

/// A single B-tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Keys in strictly ascending order.
    keys: Vec<Key>,

    /// Child subtrees. Empty for a leaf, `keys.len() + 1` entries otherwise.
    children: Vec<Node>,
}

/// The location of a key found by [`BTree::search`](super::BTree::search).
///
/// Borrows the node that holds the key together with the key's slot in it.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    node: &'a Node,
    index: usize,
}

impl<'a> SearchHit<'a> {
    /// The node containing the key.
    #[inline]
    pub fn node(&self) -> &'a Node {
        self.node
    }

    /// Slot of the key within [`node().keys()`](Node::keys).
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The key that was found.
    #[inline]
    pub fn key(&self) -> Key {
        self.node.keys[self.index]
    }
}

impl Node {
    /// Create a leaf holding a single key.
    pub(crate) fn with_key(key: Key, degree: Degree) -> Self {
        let mut keys = Vec::with_capacity(degree.max_keys());
        keys.push(key);
        Self {
            keys,
            children: Vec::new(),
        }
    }

    /// Create an empty internal node whose only child is `child`.
    ///
    /// The result is not a valid node on its own; the caller must split
    /// `child` immediately so the node gains its first key.
    pub(crate) fn above(child: Node, degree: Degree) -> Self {
        let mut children = Vec::with_capacity(degree.max_children());
        children.push(child);
        Self {
            keys: Vec::with_capacity(degree.max_keys()),
            children,
        }
    }

    // ========================================================================
    // Read-only accessors
    // ========================================================================

    /// Keys stored in this node, ascending.
    #[inline]
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    /// Child subtrees, left to right. Empty for a leaf.
    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Number of keys stored in this node.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if the node holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Check if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if the node holds `2t - 1` keys and must be split before
    /// anything is inserted below it.
    #[inline]
    pub fn is_full(&self, degree: Degree) -> bool {
        self.keys.len() == degree.max_keys()
    }

    /// Assemble a node from raw parts, bypassing every invariant.
    #[cfg(test)]
    pub(crate) fn from_parts(keys: Vec<Key>, children: Vec<Node>) -> Self {
        Self { keys, children }
    }

    /// Mutable access to the child at slot `i`.
    #[inline]
    pub(crate) fn child_mut(&mut self, i: usize) -> &mut Node {
        &mut self.children[i]
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Find `key` in this subtree.
    ///
    /// Scans for the first slot whose key is `>= key`. A match stops the
    /// search here; otherwise the search continues in the child that
    /// brackets `key`, or ends at a leaf.
    pub(crate) fn search(&self, key: Key) -> Option<SearchHit<'_>> {
        let i = self.child_slot(key);
        if self.keys.get(i) == Some(&key) {
            return Some(SearchHit {
                node: self,
                index: i,
            });
        }
        if self.is_leaf() {
            return None;
        }
        self.children[i].search(key)
    }

    /// Append the keys of this subtree to `out` in ascending order.
    pub(crate) fn traverse(&self, out: &mut Vec<Key>) {
        if self.is_leaf() {
            out.extend_from_slice(&self.keys);
            return;
        }
        for (child, &key) in self.children.iter().zip(&self.keys) {
            child.traverse(out);
            out.push(key);
        }
        // n keys zip with the first n children; the last child follows.
        self.children[self.keys.len()].traverse(out);
    }

    /// First slot whose key is `>= key`, or `len()` if none.
    #[inline]
    fn child_slot(&self, key: Key) -> usize {
        self.keys
            .iter()
            .position(|&k| k >= key)
            .unwrap_or(self.keys.len())
    }

    // ========================================================================
    // Insertion
    // ========================================================================

    /// Insert `key` into this subtree, which must not be full.
    ///
    /// Every full child met on the way down is split before descending
    /// into it, so the recursion always enters a node with room for one
    /// more key. Returns the number of splits performed.
    ///
    /// The caller guarantees `key` is not already present.
    pub(crate) fn insert_non_full(&mut self, key: Key, degree: Degree) -> usize {
        debug_assert!(self.keys.len() < degree.max_keys(), "insert into full node");

        // Scan from the right, the direction keys shift in a leaf.
        let mut i = self.keys.len();
        while i > 0 && self.keys[i - 1] > key {
            i -= 1;
        }

        if self.is_leaf() {
            self.keys.insert(i, key);
            return 0;
        }

        let mut splits = 0;
        if self.children[i].is_full(degree) {
            self.split_child(i, degree);
            splits += 1;
            // The promoted median now sits at slot i; the key belongs to
            // its right if it is larger.
            if self.keys[i] < key {
                i += 1;
            }
        }
        splits + self.children[i].insert_non_full(key, degree)
    }

    /// Split the full child at slot `i` around its median.
    ///
    /// The child keeps its lower `t - 1` keys (and lower `t` children),
    /// a new right sibling takes the upper `t - 1` keys (and upper `t`
    /// children), and the median moves up into this node at slot `i`
    /// with the sibling as child `i + 1`.
    ///
    /// ```text
    ///   before:   [ .. a .. ]            after:   [ .. a  m .. ]
    ///                 |                               |    \
    ///         [ l0 l1 m r0 r1 ]                  [ l0 l1 ] [ r0 r1 ]
    /// ```
    pub(crate) fn split_child(&mut self, i: usize, degree: Degree) {
        let t = degree.get();
        let child = &mut self.children[i];
        debug_assert!(child.is_full(degree), "split of non-full child");

        let mut upper_keys = Vec::with_capacity(degree.max_keys());
        upper_keys.extend(child.keys.drain(t..));
        let median = child.keys[t - 1];
        child.keys.truncate(t - 1);

        let mut upper_children = Vec::new();
        if !child.is_leaf() {
            upper_children.reserve(degree.max_children());
            upper_children.extend(child.children.drain(t..));
        }

        let sibling = Node {
            keys: upper_keys,
            children: upper_children,
        };

        self.keys.insert(i, median);
        self.children.insert(i + 1, sibling);

        trace!(slot = i, median, "split child");
    }
}
