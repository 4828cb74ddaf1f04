//! Contract error taxonomy.
//!
//! Every variant carries the qualified method name it concerns, so a failure
//! reads as a statement about the offending call site rather than about
//! interceptor internals.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised at the boundary of a contracted call, or when building
/// contracts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum ContractError {
    /// An argument failed its declared expectation.
    #[error("{detail} in call to `{method}`")]
    CallViolation { method: String, detail: String },

    /// The return value failed its declared expectation.
    #[error("{detail} in return of `{method}`")]
    ReturnViolation { method: String, detail: String },

    /// A nothrow method's body raised. The original message is preserved
    /// verbatim.
    #[error("nothrow method `{method}` raised: {message}")]
    UnexpectedException { method: String, message: String },

    /// The call exceeded its hard runtime cap.
    #[error("`{method}` took longer than allowed: {elapsed:.2?} > {max:.2?}")]
    RuntimeExceeded {
        method: String,
        elapsed: Duration,
        max: Duration,
    },

    /// The caller passed an unsupported number of arguments. Raised before
    /// any hook runs.
    #[error(
        "wrong number of arguments for `{method}` ({actual} for {expected})",
        expected = if min == max { min.to_string() } else { format!("{}..{}", min, max) }
    )]
    ArgumentCount {
        method: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    /// An annotation was constructed with invalid parameters.
    #[error("invalid contract configuration: {reason}")]
    Configuration { reason: String },
}

/// What a contracted method body may fail with.
pub type BodyError = Box<dyn std::error::Error + Send + Sync>;

/// Failure of one invocation of a contracted method: a contract check
/// rejected the call, or the body itself raised. Body errors are re-raised
/// unchanged unless an exception hook supersedes them.
#[derive(Debug, Error)]
pub enum CallError {
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// The body's own error, re-raised. Displays as the original message.
    #[error("{0}")]
    Raised(BodyError),
}

impl CallError {
    /// The contract error, if this failure is one.
    pub fn as_contract(&self) -> Option<&ContractError> {
        match self {
            CallError::Contract(e) => Some(e),
            CallError::Raised(_) => None,
        }
    }
}
