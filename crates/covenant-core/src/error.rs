//! Error types for the expectation facade.
//!
//! The matcher itself reports failures as [`crate::matcher::Mismatch`]
//! values; `ExpectError` is what the enforcing entry points return at the
//! caller-facing boundary.

use thiserror::Error;

/// Errors produced by the expectation facade.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExpectError {
    /// An expectation was not met. Carries the rendered mismatch.
    #[error("{0}")]
    Unmet(String),

    /// A pattern could not be constructed (e.g. a bad regex source).
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}
