//! Runtime value matching and expectation checking.
//!
//! Covenant's core: a recursive matcher that decides whether a dynamic
//! [`Value`] satisfies a declarative [`Pattern`], and the expectation facade
//! built on top of it.
//!
//! - [`matcher::match_value`] returns structured [`Mismatch`] evidence
//!   (failing sub-value, failing sub-pattern, index or key path).
//! - [`expect::expect`] enforces a list of checks and reports the first
//!   failure as an [`ExpectError`] at the caller's boundary.
//! - [`assertions`] exposes the same verdict without an error type, for
//!   test-framework helpers.
//!
//! # Usage
//!
//! ```
//! use covenant_core::{expect, pair, truthy, Pattern, TypeTag, Value};
//!
//! let options = Value::map([("foo", "bar")]);
//! expect(&[
//!     pair("http://example.com", Pattern::regex("^http:").unwrap()),
//!     pair(2, Pattern::Type(TypeTag::Int) | Pattern::Type(TypeTag::Float)),
//!     pair(options, Pattern::shape([("foo", Pattern::Type(TypeTag::Text))])),
//!     truthy(true),
//! ])
//! .unwrap();
//! ```

pub mod assertions;
pub mod error;
pub mod expect;
pub mod matcher;
pub mod pattern;
pub mod value;

// Re-export commonly used types
pub use error::ExpectError;
pub use expect::{
    block, check_all, checking_enabled, expect, expect_soft, expect_with, pair, retry_budget,
    set_checking, set_retry_budget, truthy, with_retry_budget, Check, POLL_INTERVAL,
};
pub use matcher::{match_value, matches, Mismatch, PathSeg};
pub use pattern::{Pattern, PredicateFn, RangePattern, TypeTag};
pub use value::Value;
