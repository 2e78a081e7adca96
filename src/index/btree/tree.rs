//! BTree - the owning handle over a tree of [`Node`]s.
//!
//! The [`BTree`] provides:
//! - Insertion with pre-emptive splitting on the way down
//! - Exact-key search
//! - In-order traversal (eager or through [`Iter`])
//! - Shape queries and structural validation

use std::fmt;
use std::sync::atomic::Ordering;

use tracing::debug;

use crate::common::{Degree, Error, Key, Result};
use crate::index::btree::{BTreeStats, Node, SearchHit};

/// An in-memory B-tree of unique integer keys.
///
/// # Shape
/// ```text
///                 root: [ 10 ]
///                     /      \
///         [ 5 | 6 | 7 ]      [ 12 | 17 | 20 | 30 ]
/// ```
/// Every non-root node holds between `t - 1` and `2t - 1` keys, every
/// internal node with `n` keys has `n + 1` children, and all leaves sit
/// at the same depth.
///
/// # Duplicates
/// Keys are unique. [`insert`](Self::insert) returns `false` for a key
/// that is already present and leaves the tree untouched;
/// [`try_insert`](Self::try_insert) reports it as `Error::DuplicateKey`.
///
/// # Usage
/// ```
/// use ordex::BTree;
///
/// let mut tree = BTree::new(3).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.traverse(), vec![5, 6, 7, 10, 12, 17, 20, 30]);
/// assert!(tree.search(6).is_some());
/// assert!(tree.search(15).is_none());
/// ```
#[derive(Debug)]
pub struct BTree {
    /// Top node, or None while the tree is empty.
    root: Option<Node>,

    /// Minimum degree, fixed at construction.
    degree: Degree,

    /// Number of keys stored.
    len: usize,

    /// Operation counters.
    stats: BTreeStats,
}

impl BTree {
    /// Create an empty tree with minimum degree `t`.
    ///
    /// # Errors
    /// - `Error::InvalidDegree` if `t < 2`
    pub fn new(t: usize) -> Result<Self> {
        Ok(Self::with_degree(Degree::new(t)?))
    }

    /// Create an empty tree with an already validated degree.
    pub fn with_degree(degree: Degree) -> Self {
        Self {
            root: None,
            degree,
            len: 0,
            stats: BTreeStats::new(),
        }
    }

    // ========================================================================
    // Public API: Mutation
    // ========================================================================

    /// Insert `key` into the tree.
    ///
    /// Returns `true` if the key was added, `false` if it was already
    /// present (in which case nothing changes, not even node layout).
    pub fn insert(&mut self, key: Key) -> bool {
        if self.find(key).is_some() {
            self.stats.duplicates_rejected.fetch_add(1, Ordering::Relaxed);
            debug!(key, "duplicate key rejected");
            return false;
        }

        let degree = self.degree;
        let (root, splits, root_split) = match self.root.take() {
            None => (Node::with_key(key, degree), 0, false),
            Some(old_root) if old_root.is_full(degree) => {
                // The root has no parent to take a median, so it is split
                // under a fresh root before descending.
                let mut new_root = Node::above(old_root, degree);
                new_root.split_child(0, degree);
                let i = usize::from(new_root.keys()[0] < key);
                let splits = 1 + new_root.child_mut(i).insert_non_full(key, degree);
                (new_root, splits, true)
            }
            Some(mut root) => {
                let splits = root.insert_non_full(key, degree);
                (root, splits, false)
            }
        };
        self.root = Some(root);
        self.len += 1;
        self.stats.record_insert(splits, root_split);

        if root_split {
            debug!(key, height = self.height(), "root split, tree grew");
        }
        true
    }

    /// Insert `key`, treating an existing key as an error.
    ///
    /// # Errors
    /// - `Error::DuplicateKey` if `key` is already stored
    pub fn try_insert(&mut self, key: Key) -> Result<()> {
        if self.insert(key) {
            Ok(())
        } else {
            Err(Error::DuplicateKey(key))
        }
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Find the node holding `key`.
    ///
    /// Returns `None` when the key is absent or the tree is empty.
    pub fn search(&self, key: Key) -> Option<SearchHit<'_>> {
        let hit = self.find(key);
        self.stats.record_search(hit.is_some());
        hit
    }

    /// Check if `key` is stored in the tree.
    pub fn contains(&self, key: Key) -> bool {
        self.search(key).is_some()
    }

    /// Lookup without touching the counters.
    fn find(&self, key: Key) -> Option<SearchHit<'_>> {
        self.root.as_ref().and_then(|root| root.search(key))
    }

    /// All keys in ascending order.
    ///
    /// Returns an empty vector for an empty tree. Calling this repeatedly
    /// without mutation yields identical results.
    pub fn traverse(&self) -> Vec<Key> {
        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = &self.root {
            root.traverse(&mut out);
        }
        out
    }

    /// Lazy in-order iterator over the keys.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_ref(), self.len)
    }

    // ========================================================================
    // Public API: Shape
    // ========================================================================

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The tree's minimum degree.
    #[inline]
    pub fn degree(&self) -> Degree {
        self.degree
    }

    /// The root node, if any.
    #[inline]
    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    /// Operation counters.
    #[inline]
    pub fn stats(&self) -> &BTreeStats {
        &self.stats
    }

    /// Number of levels: 0 when empty, 1 for a lone leaf root.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_ref();
        while let Some(current) = node {
            height += 1;
            node = current.children().first();
        }
        height
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        fn count(node: &Node) -> usize {
            1 + node.children().iter().map(count).sum::<usize>()
        }
        self.root.as_ref().map_or(0, count)
    }

    /// Key lists of every node, grouped by depth, left to right.
    pub fn levels(&self) -> Vec<Vec<Vec<Key>>> {
        let mut levels = Vec::new();
        let mut frontier: Vec<&Node> = self.root.iter().collect();
        while !frontier.is_empty() {
            levels.push(frontier.iter().map(|n| n.keys().to_vec()).collect());
            frontier = frontier.iter().flat_map(|n| n.children()).collect();
        }
        levels
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Check every structural invariant of the tree.
    ///
    /// # Errors
    /// - `Error::InvariantViolation` describing the first broken rule
    pub fn validate(&self) -> Result<()> {
        let Some(root) = &self.root else {
            if self.len != 0 {
                return Err(violation(format!("empty tree reports len {}", self.len)));
            }
            return Ok(());
        };

        let mut check = Validator {
            degree: self.degree,
            leaf_depth: None,
            keys_seen: 0,
        };
        check.node(root, 0, None, None)?;

        if check.keys_seen != self.len {
            return Err(violation(format!(
                "len is {} but tree holds {} keys",
                self.len, check.keys_seen
            )));
        }
        Ok(())
    }
}

fn violation(reason: String) -> Error {
    Error::InvariantViolation(reason)
}

/// Recursive walker behind [`BTree::validate`].
struct Validator {
    degree: Degree,
    leaf_depth: Option<usize>,
    keys_seen: usize,
}

impl Validator {
    /// Check `node` at `depth`; all its keys must lie strictly inside
    /// `(lower, upper)`.
    fn node(
        &mut self,
        node: &Node,
        depth: usize,
        lower: Option<Key>,
        upper: Option<Key>,
    ) -> Result<()> {
        let keys = node.keys();
        let n = keys.len();

        let min = if depth == 0 { 1 } else { self.degree.min_keys() };
        if n < min || n > self.degree.max_keys() {
            return Err(violation(format!(
                "node at depth {} holds {} keys, allowed {}..={}",
                depth,
                n,
                min,
                self.degree.max_keys()
            )));
        }

        if keys.windows(2).any(|w| w[0] >= w[1]) {
            return Err(violation(format!("keys not strictly ascending: {:?}", keys)));
        }
        if let Some(lo) = lower {
            if keys[0] <= lo {
                return Err(violation(format!("key {} not above bound {}", keys[0], lo)));
            }
        }
        if let Some(hi) = upper {
            if keys[n - 1] >= hi {
                return Err(violation(format!("key {} not below bound {}", keys[n - 1], hi)));
            }
        }
        self.keys_seen += n;

        if node.is_leaf() {
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(violation(format!(
                        "leaf at depth {}, expected {}",
                        depth, expected
                    )));
                }
                Some(_) => {}
            }
            return Ok(());
        }

        let children = node.children();
        if children.len() != n + 1 {
            return Err(violation(format!(
                "internal node with {} keys has {} children",
                n,
                children.len()
            )));
        }
        for (i, child) in children.iter().enumerate() {
            let lo = if i == 0 { lower } else { Some(keys[i - 1]) };
            let hi = if i == n { upper } else { Some(keys[i]) };
            self.node(child, depth + 1, lo, hi)?;
        }
        Ok(())
    }
}

impl Default for BTree {
    fn default() -> Self {
        Self::with_degree(Degree::default())
    }
}

impl Extend<Key> for BTree {
    fn extend<I: IntoIterator<Item = Key>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl FromIterator<Key> for BTree {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut tree = BTree::default();
        tree.extend(iter);
        tree
    }
}

impl<'a> IntoIterator for &'a BTree {
    type Item = Key;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Renders one line per node, indented by depth:
///
/// ```text
/// Level 0: [10]
///   Level 1: [5, 6, 7]
///   Level 1: [12, 17, 20, 30]
/// ```
impl fmt::Display for BTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
            writeln!(f, "{:indent$}Level {}: {:?}", "", depth, node.keys(), indent = depth * 2)?;
            for child in node.children() {
                write_node(f, child, depth + 1)?;
            }
            Ok(())
        }

        match &self.root {
            None => writeln!(f, "Level 0: []"),
            Some(root) => write_node(f, root, 0),
        }
    }
}

// ============================================================================
// Iterator
// ============================================================================

/// In-order iterator over a [`BTree`]'s keys.
///
/// Keeps a stack of `(node, next slot)` frames along the path to the
/// next key, so memory use is bounded by the tree height.
pub struct Iter<'a> {
    stack: Vec<(&'a Node, usize)>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        if let Some(root) = root {
            iter.descend(root);
        }
        iter
    }

    /// Push `node` and its leftmost descendants.
    fn descend(&mut self, mut node: &'a Node) {
        loop {
            self.stack.push((node, 0));
            match node.children().first() {
                Some(child) => node = child,
                None => break,
            }
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        loop {
            let (node, slot) = self.stack.last_mut()?;
            let node: &'a Node = *node;
            if *slot < node.len() {
                let key = node.keys()[*slot];
                *slot += 1;
                let next = *slot;
                if !node.is_leaf() {
                    self.descend(&node.children()[next]);
                }
                self.remaining -= 1;
                return Some(key);
            }
            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [Key; 8] = [10, 20, 5, 6, 12, 30, 7, 17];

    fn sample_tree() -> BTree {
        let mut tree = BTree::new(3).unwrap();
        for key in SAMPLE {
            assert!(tree.insert(key));
        }
        tree
    }

    #[test]
    fn test_new_rejects_small_degree() {
        assert_eq!(BTree::new(1).unwrap_err(), Error::InvalidDegree(1));
        assert_eq!(BTree::new(0).unwrap_err(), Error::InvalidDegree(0));
        assert!(BTree::new(2).is_ok());
    }

    #[test]
    fn test_empty_tree() {
        let tree = BTree::new(3).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.node_count(), 0);
        assert!(tree.traverse().is_empty());
        assert!(tree.search(1).is_none());
        assert!(tree.root().is_none());
        assert_eq!(tree.iter().next(), None);
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_first_insert_creates_leaf_root() {
        let mut tree = BTree::new(3).unwrap();
        assert!(tree.insert(42));

        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.keys(), &[42]);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn test_sample_traverse_and_search() {
        let tree = sample_tree();

        assert_eq!(tree.traverse(), vec![5, 6, 7, 10, 12, 17, 20, 30]);
        assert!(tree.search(6).is_some());
        assert!(tree.search(15).is_none());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_sample_shape() {
        let tree = sample_tree();

        // The sixth insert (30) overflows the five-key root.
        assert_eq!(
            tree.levels(),
            vec![vec![vec![10]], vec![vec![5, 6, 7], vec![12, 17, 20, 30]]]
        );
        assert_eq!(tree.height(), 2);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_search_hit_location() {
        let tree = sample_tree();

        let hit = tree.search(10).unwrap();
        assert_eq!(hit.key(), 10);
        assert_eq!(hit.index(), 0);
        assert!(!hit.node().is_leaf());

        let hit = tree.search(20).unwrap();
        assert_eq!(hit.node().keys(), &[12, 17, 20, 30]);
        assert_eq!(hit.index(), 2);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut tree = sample_tree();
        let before = tree.levels();

        assert!(!tree.insert(12));
        assert_eq!(tree.try_insert(12), Err(Error::DuplicateKey(12)));

        assert_eq!(tree.len(), SAMPLE.len());
        assert_eq!(tree.levels(), before);
        assert_eq!(tree.stats().snapshot().duplicates_rejected, 2);
    }

    #[test]
    fn test_duplicate_into_full_root_does_not_split() {
        let mut tree = BTree::new(2).unwrap();
        tree.extend([1, 2, 3]);
        assert_eq!(tree.height(), 1);

        assert!(!tree.insert(2));
        assert_eq!(tree.height(), 1);
        assert_eq!(tree.stats().snapshot().root_splits, 0);
    }

    #[test]
    fn test_boundary_split() {
        for t in 2..6 {
            let degree = Degree::new(t).unwrap();
            let mut tree = BTree::with_degree(degree);
            for key in 0..degree.max_keys() as Key {
                tree.insert(key);
            }
            assert_eq!(tree.height(), 1, "t={}", t);

            tree.insert(degree.max_keys() as Key);
            assert_eq!(tree.height(), 2, "t={}", t);
            assert_eq!(tree.stats().snapshot().node_splits, 1);
            assert!(tree.validate().is_ok());
        }
    }

    #[test]
    fn test_iter_matches_traverse() {
        let mut tree = BTree::new(2).unwrap();
        tree.extend((0..200).rev());

        let iter = tree.iter();
        assert_eq!(iter.len(), 200);
        assert_eq!(iter.collect::<Vec<_>>(), tree.traverse());
        assert_eq!((&tree).into_iter().next(), Some(0));
    }

    #[test]
    fn test_traverse_idempotent() {
        let tree = sample_tree();
        assert_eq!(tree.traverse(), tree.traverse());
    }

    #[test]
    fn test_from_iterator() {
        let tree: BTree = [3, 1, 2, 1].into_iter().collect();
        assert_eq!(tree.degree(), Degree::default());
        assert_eq!(tree.traverse(), vec![1, 2, 3]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_stats_counts() {
        let tree = sample_tree();
        tree.search(6);
        tree.search(15);
        tree.contains(30);

        let snapshot = tree.stats().snapshot();
        assert_eq!(snapshot.inserts, 8);
        assert_eq!(snapshot.root_splits, 1);
        assert_eq!(snapshot.searches, 3);
        assert_eq!(snapshot.search_hits, 2);
    }

    #[test]
    fn test_display() {
        let tree = sample_tree();
        let rendered = format!("{}", tree);
        assert_eq!(
            rendered,
            "Level 0: [10]\n  Level 1: [5, 6, 7]\n  Level 1: [12, 17, 20, 30]\n"
        );

        let empty = BTree::default();
        assert_eq!(format!("{}", empty), "Level 0: []\n");
    }

    // ========================================================================
    // Validation rejects malformed trees
    // ========================================================================

    fn leaf(keys: &[Key]) -> Node {
        Node::from_parts(keys.to_vec(), Vec::new())
    }

    fn raw_tree(t: usize, root: Option<Node>, len: usize) -> BTree {
        BTree {
            root,
            degree: Degree::new(t).unwrap(),
            len,
            stats: BTreeStats::new(),
        }
    }

    fn assert_invalid(tree: &BTree) {
        match tree.validate() {
            Err(Error::InvariantViolation(_)) => {}
            other => panic!("expected InvariantViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_hand_built_tree() {
        let root = Node::from_parts(vec![10], vec![leaf(&[5]), leaf(&[15, 20])]);
        assert!(raw_tree(2, Some(root), 4).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_keyless_root() {
        let degree = Degree::new(2).unwrap();
        let root = Node::above(Node::with_key(1, degree), degree);
        assert_invalid(&raw_tree(2, Some(root), 1));
    }

    #[test]
    fn test_validate_rejects_len_mismatch() {
        assert_invalid(&raw_tree(2, Some(leaf(&[1, 2])), 3));
        assert_invalid(&raw_tree(2, None, 1));
    }

    #[test]
    fn test_validate_rejects_underfull_child() {
        let root = Node::from_parts(vec![10], vec![leaf(&[1, 2]), leaf(&[20])]);
        assert_invalid(&raw_tree(3, Some(root), 4));
    }

    #[test]
    fn test_validate_rejects_overfull_node() {
        assert_invalid(&raw_tree(2, Some(leaf(&[1, 2, 3, 4])), 4));
    }

    #[test]
    fn test_validate_rejects_unsorted_keys() {
        assert_invalid(&raw_tree(2, Some(leaf(&[2, 1])), 2));
    }

    #[test]
    fn test_validate_rejects_key_outside_parent_bound() {
        let right_too_small = Node::from_parts(vec![10], vec![leaf(&[5]), leaf(&[8])]);
        assert_invalid(&raw_tree(2, Some(right_too_small), 3));

        let left_too_large = Node::from_parts(vec![10], vec![leaf(&[12]), leaf(&[15])]);
        assert_invalid(&raw_tree(2, Some(left_too_large), 3));
    }

    #[test]
    fn test_validate_rejects_missing_child() {
        let root = Node::from_parts(vec![10, 20], vec![leaf(&[5]), leaf(&[15])]);
        assert_invalid(&raw_tree(2, Some(root), 4));
    }

    #[test]
    fn test_validate_rejects_uneven_leaf_depth() {
        let deep = Node::from_parts(vec![20], vec![leaf(&[15]), leaf(&[25])]);
        let root = Node::from_parts(vec![10], vec![leaf(&[5]), deep]);
        assert_invalid(&raw_tree(2, Some(root), 5));
    }
}
