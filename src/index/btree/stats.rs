//! B-tree statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics tracked by a B-tree.
///
/// All fields are atomic so lookups can record themselves through `&self`.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` for all operations because:
/// - We only need atomicity (no partial updates)
/// - Counters are independent of each other
///
/// # Example
/// ```
/// use ordex::BTreeStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = BTreeStats::new();
/// stats.searches.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.searches.load(Ordering::Relaxed), 1);
/// ```
#[derive(Debug)]
pub struct BTreeStats {
    /// Number of keys successfully inserted.
    pub inserts: AtomicU64,

    /// Number of inserts refused because the key was already present.
    pub duplicates_rejected: AtomicU64,

    /// Number of lookups performed.
    pub searches: AtomicU64,

    /// Number of lookups that found their key.
    pub search_hits: AtomicU64,

    /// Number of node splits, root splits included.
    pub node_splits: AtomicU64,

    /// Number of root splits (each one grows the tree by a level).
    pub root_splits: AtomicU64,
}

impl BTreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            inserts: AtomicU64::new(0),
            duplicates_rejected: AtomicU64::new(0),
            searches: AtomicU64::new(0),
            search_hits: AtomicU64::new(0),
            node_splits: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
        }
    }

    /// Record a lookup and whether it found its key.
    #[inline]
    pub(crate) fn record_search(&self, hit: bool) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        if hit {
            self.search_hits.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a completed insert and the splits it caused.
    #[inline]
    pub(crate) fn record_insert(&self, splits: usize, root_split: bool) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
        self.node_splits.fetch_add(splits as u64, Ordering::Relaxed);
        if root_split {
            self.root_splits.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Calculate search hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        self.snapshot().hit_rate()
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            duplicates_rejected: self.duplicates_rejected.load(Ordering::Relaxed),
            searches: self.searches.load(Ordering::Relaxed),
            search_hits: self.search_hits.load(Ordering::Relaxed),
            node_splits: self.node_splits.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.inserts.store(0, Ordering::Relaxed);
        self.duplicates_rejected.store(0, Ordering::Relaxed);
        self.searches.store(0, Ordering::Relaxed);
        self.search_hits.store(0, Ordering::Relaxed);
        self.node_splits.store(0, Ordering::Relaxed);
        self.root_splits.store(0, Ordering::Relaxed);
    }
}

impl Default for BTreeStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of B-tree statistics.
///
/// Unlike `BTreeStats`, this is a plain value that can be copied,
/// compared and printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub inserts: u64,
    pub duplicates_rejected: u64,
    pub searches: u64,
    pub search_hits: u64,
    pub node_splits: u64,
    pub root_splits: u64,
}

impl StatsSnapshot {
    /// Calculate search hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        if self.searches == 0 {
            0.0
        } else {
            self.search_hits as f64 / self.searches as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, duplicates: {}, searches: {}, hit_rate: {:.2}%, splits: {}, root_splits: {} }}",
            self.inserts,
            self.duplicates_rejected,
            self.searches,
            self.hit_rate() * 100.0,
            self.node_splits,
            self.root_splits
        )
    }
}
