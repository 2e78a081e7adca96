//! Error types for ordex.

use thiserror::Error as ThisError;

use crate::common::Key;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in ordex.
///
/// Lookups never fail: a missing key is reported with `None`, not an error.
/// Errors only come from misconfiguration, the strict insert path, and
/// structural validation.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// The requested minimum degree is below 2.
    ///
    /// A degree of 0 or 1 cannot satisfy the occupancy bounds, so the tree
    /// refuses to be built with one.
    #[error("Invalid minimum degree {0}: must be at least 2")]
    InvalidDegree(usize),

    /// The key is already stored in the tree.
    #[error("Key {0} already exists")]
    DuplicateKey(Key),

    /// A structural check failed.
    ///
    /// This indicates a bug in the insertion path.
    #[error("B-tree invariant violated: {0}")]
    InvariantViolation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDegree(1);
        assert_eq!(format!("{}", err), "Invalid minimum degree 1: must be at least 2");

        let err = Error::DuplicateKey(42);
        assert_eq!(format!("{}", err), "Key 42 already exists");

        let err = Error::InvariantViolation("leaf depth mismatch".into());
        assert_eq!(
            format!("{}", err),
            "B-tree invariant violated: leaf depth mismatch"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&Error::DuplicateKey(7));
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
