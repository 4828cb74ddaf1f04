//! Annotation kinds: the contract hooks that run around a contracted body.
//!
//! An [`Annotation`] is created by a declarator ([`expects`], [`returns`],
//! [`nothrow`], [`max_runtime`]), bound to its method at the definition
//! event, and invoked on every call thereafter. Which hook points a kind
//! participates in is reported through [`HookSet`], computed once when the
//! wrapper is built -- never probed per call.

mod expects;
mod nothrow;
mod returns;
mod runtime;

pub use expects::ExpectsContract;
pub use nothrow::NothrowContract;
pub use returns::ReturnsContract;
pub use runtime::RuntimeContract;

use std::sync::Arc;
use std::time::{Duration, Instant};

use covenant_core::{Pattern, Value};

use crate::error::{BodyError, ContractError};
use crate::method::{Invocation, MethodSpec};

/// Which hook points an annotation participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookSet {
    pub before: bool,
    pub after: bool,
    pub exception: bool,
}

/// Per-invocation state produced by a before hook and handed back,
/// unmodified, to the same annotation's after or exception hook. Stack-local
/// to the invocation; never stored on the annotation, so concurrent calls
/// cannot interfere.
#[derive(Debug, Clone, Copy)]
pub enum ScopeValue {
    StartedAt(Instant),
}

/// A contract attached to a method.
#[derive(Debug, Clone)]
pub enum Annotation {
    Expects(ExpectsContract),
    Returns(ReturnsContract),
    Nothrow(NothrowContract),
    Runtime(RuntimeContract),
}

impl Annotation {
    pub(crate) fn hooks(&self) -> HookSet {
        match self {
            Annotation::Expects(_) => HookSet {
                before: true,
                after: false,
                exception: false,
            },
            Annotation::Returns(_) => HookSet {
                before: false,
                after: true,
                exception: false,
            },
            Annotation::Nothrow(_) => HookSet {
                before: false,
                after: false,
                exception: true,
            },
            Annotation::Runtime(_) => HookSet {
                before: true,
                after: true,
                exception: false,
            },
        }
    }

    /// Attach the annotation to the method it now guards. Called once, at
    /// the definition event.
    pub(crate) fn bind(&mut self, spec: &Arc<MethodSpec>) {
        match self {
            Annotation::Expects(c) => c.bind(spec),
            Annotation::Returns(c) => c.bind(spec),
            Annotation::Nothrow(c) => c.bind(spec),
            Annotation::Runtime(c) => c.bind(spec),
        }
    }

    pub(crate) fn before_call(
        &self,
        inv: Invocation<'_>,
    ) -> Result<Option<ScopeValue>, ContractError> {
        match self {
            Annotation::Expects(c) => c.before_call(inv).map(|()| None),
            Annotation::Runtime(c) => Ok(Some(c.before_call(inv))),
            Annotation::Returns(_) | Annotation::Nothrow(_) => Ok(None),
        }
    }

    pub(crate) fn after_call(
        &self,
        scope: Option<&ScopeValue>,
        rv: &Value,
        inv: Invocation<'_>,
    ) -> Result<(), ContractError> {
        match self {
            Annotation::Returns(c) => c.after_call(rv, inv),
            Annotation::Runtime(c) => c.after_call(scope, rv, inv),
            Annotation::Expects(_) | Annotation::Nothrow(_) => Ok(()),
        }
    }

    pub(crate) fn on_exception(
        &self,
        _scope: Option<&ScopeValue>,
        error: &BodyError,
        inv: Invocation<'_>,
    ) -> Result<(), ContractError> {
        match self {
            Annotation::Nothrow(c) => c.on_exception(error, inv),
            _ => Ok(()),
        }
    }
}

/// Declares per-parameter argument expectations, looked up by parameter
/// name when the annotation is bound.
pub fn expects<K, P, I>(expectations: I) -> Annotation
where
    K: Into<String>,
    P: Into<Pattern>,
    I: IntoIterator<Item = (K, P)>,
{
    Annotation::Expects(ExpectsContract::new(expectations))
}

/// Declares an expectation on the return value.
pub fn returns(pattern: impl Into<Pattern>) -> Annotation {
    Annotation::Returns(ReturnsContract::new(pattern))
}

/// Declares that no error may escape the body.
pub fn nothrow() -> Annotation {
    Annotation::Nothrow(NothrowContract::new())
}

/// Declares a wall-clock runtime contract: warn past `expected`, fail past
/// `max`. Fails at construction when `expected` exceeds `max`.
pub fn max_runtime(
    expected: Duration,
    max: Option<Duration>,
) -> Result<Annotation, ContractError> {
    RuntimeContract::new(expected, max).map(Annotation::Runtime)
}
