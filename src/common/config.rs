//! Configuration constants for ordex.

/// Smallest legal minimum degree `t`.
///
/// With `t = 2` every node holds 1 to 3 keys and 2 to 4 children
/// (a 2-3-4 tree). Anything smaller cannot be split into two non-empty
/// halves around a median.
pub const MIN_DEGREE: usize = 2;

/// Minimum degree used by `BTree::default()`.
///
/// # Node Shape
/// With `t = 3`:
/// - Max keys per node: 5
/// - Min keys per non-root node: 2
/// - Max children per node: 6
pub const DEFAULT_DEGREE: usize = 3;
