//! Minimum degree type.

use std::fmt;

use crate::common::config::{DEFAULT_DEGREE, MIN_DEGREE};
use crate::common::{Error, Result};

/// The minimum degree `t` of a B-tree.
///
/// Fixed when the tree is built and shared read-only by every node
/// operation afterwards. The value is validated once, so code holding a
/// `Degree` never needs to re-check `t >= 2`.
///
/// # Example
/// ```
/// use ordex::Degree;
///
/// let degree = Degree::new(3).unwrap();
/// assert_eq!(degree.max_keys(), 5);
/// assert_eq!(degree.min_keys(), 2);
/// assert_eq!(degree.max_children(), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Degree(usize);

impl Degree {
    /// Create a new Degree.
    ///
    /// # Errors
    /// - `Error::InvalidDegree` if `t < 2`
    pub fn new(t: usize) -> Result<Self> {
        if t < MIN_DEGREE {
            return Err(Error::InvalidDegree(t));
        }
        Ok(Degree(t))
    }

    /// The raw value of `t`.
    #[inline]
    pub fn get(&self) -> usize {
        self.0
    }

    /// Most keys any node may hold (`2t - 1`).
    #[inline]
    pub fn max_keys(&self) -> usize {
        2 * self.0 - 1
    }

    /// Fewest keys a non-root node may hold (`t - 1`).
    #[inline]
    pub fn min_keys(&self) -> usize {
        self.0 - 1
    }

    /// Most children an internal node may hold (`2t`).
    #[inline]
    pub fn max_children(&self) -> usize {
        2 * self.0
    }
}

impl Default for Degree {
    fn default() -> Self {
        Degree(DEFAULT_DEGREE)
    }
}

impl TryFrom<usize> for Degree {
    type Error = Error;

    fn try_from(t: usize) -> Result<Self> {
        Degree::new(t)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}", self.0)
    }
}
