//! Common types and utilities shared across ordex.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants
//! - Error types
//! - The key type and the minimum degree

pub mod config;
mod degree;
pub mod error;

pub use degree::Degree;
pub use error::{Error, Result};

/// The key type stored in the index.
pub type Key = i64;
