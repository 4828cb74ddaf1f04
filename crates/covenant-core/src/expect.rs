//! The expectation facade: enforceable checks over values and blocks.
//!
//! Where the matcher returns a [`Mismatch`], the facade returns an
//! [`ExpectError`] constructed right at this boundary, so the failure a
//! caller sees points at their own call site and not at matcher internals.
//!
//! Block checks can be re-polled against a thread-local retry budget, which
//! lets callers wait for an asynchronous condition without writing their own
//! polling loop.

use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::error::ExpectError;
use crate::matcher::{match_value, Mismatch};
use crate::pattern::{Pattern, PredicateFn};
use crate::value::Value;

/// How often a block check is re-polled while a retry budget is set.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// One facade check item.
#[derive(Clone)]
pub enum Check {
    /// A bare value that must be truthy.
    Truthy(Value),
    /// A value matched against a pattern.
    Pair(Value, Pattern),
    /// A deferred condition: invoked with no arguments, must return true.
    /// The escape hatch for compound conditions the pattern vocabulary
    /// cannot express.
    Block(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl Check {
    /// Evaluate this check once.
    pub fn verify(&self) -> Result<(), Mismatch> {
        match self {
            Check::Truthy(value) => match_value(value, &Pattern::Truthy),
            Check::Pair(value, pattern) => match_value(value, pattern),
            Check::Block(f) => match_value(
                &Value::Nil,
                &Pattern::Predicate(PredicateFn::Nullary(f.clone())),
            ),
        }
    }

    fn is_block(&self) -> bool {
        matches!(self, Check::Block(_))
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Truthy(value) => f.debug_tuple("Truthy").field(value).finish(),
            Check::Pair(value, pattern) => {
                f.debug_tuple("Pair").field(value).field(pattern).finish()
            }
            Check::Block(_) => f.debug_tuple("Block").finish(),
        }
    }
}

/// A `value => pattern` check.
pub fn pair(value: impl Into<Value>, pattern: impl Into<Pattern>) -> Check {
    Check::Pair(value.into(), pattern.into())
}

/// A bare value check: the value must be truthy.
pub fn truthy(value: impl Into<Value>) -> Check {
    Check::Truthy(value.into())
}

/// A block check.
pub fn block(f: impl Fn() -> bool + Send + Sync + 'static) -> Check {
    Check::Block(Arc::new(f))
}

/// Evaluates `checks` in order and returns the first failure. This is the
/// non-raising verdict used by test helpers; [`expect`] is the enforcing
/// form.
pub fn check_all(checks: &[Check]) -> Result<(), Mismatch> {
    for check in checks {
        check.verify()?;
    }
    Ok(())
}

/// Enforces `checks`, first failure wins.
///
/// Value checks are evaluated once, in order. Block checks are then polled
/// against the current retry budget (a single evaluation when none is set),
/// reporting the last observed failure.
pub fn expect(checks: &[Check]) -> Result<(), ExpectError> {
    for check in checks {
        if check.is_block() {
            continue;
        }
        check
            .verify()
            .map_err(|mismatch| ExpectError::Unmet(mismatch.to_string()))?;
    }
    for check in checks {
        if let Check::Block(f) = check {
            verify_block(f.as_ref())?;
        }
    }
    Ok(())
}

/// [`expect`] with a trailing block check appended.
pub fn expect_with(
    checks: &[Check],
    f: impl Fn() -> bool + Send + Sync + 'static,
) -> Result<(), ExpectError> {
    let mut all = checks.to_vec();
    all.push(block(f));
    expect(&all)
}

/// [`expect`], except it is a no-op while checking is disabled via
/// [`set_checking`].
pub fn expect_soft(checks: &[Check]) -> Result<(), ExpectError> {
    if !checking_enabled() {
        return Ok(());
    }
    expect(checks)
}

// ---------------------------------------------------------------------------
// Retry budget (thread-local)

thread_local! {
    static RETRY_BUDGET: Cell<Option<Duration>> = const { Cell::new(None) };
}

/// Restores the saved budget when the polling scope exits, normally or not.
struct BudgetGuard(Option<Duration>);

impl Drop for BudgetGuard {
    fn drop(&mut self) {
        RETRY_BUDGET.with(|cell| cell.set(self.0));
    }
}

/// Sets this thread's retry budget for the next block check.
pub fn set_retry_budget(budget: Option<Duration>) {
    RETRY_BUDGET.with(|cell| cell.set(budget));
}

/// This thread's current retry budget, if any.
pub fn retry_budget() -> Option<Duration> {
    RETRY_BUDGET.with(|cell| cell.get())
}

/// Runs `f` with the retry budget set to `budget`, restoring the previous
/// value afterwards so nested and sequential uses don't leak state.
pub fn with_retry_budget<T>(budget: Duration, f: impl FnOnce() -> T) -> T {
    let previous = RETRY_BUDGET.with(|cell| cell.replace(Some(budget)));
    let _restore = BudgetGuard(previous);
    f()
}

/// Polls `f` until it succeeds or the budget elapses. The budget is cleared
/// while polling (nested expects must not reuse it) and restored on exit.
fn verify_block(f: &(dyn Fn() -> bool + Send + Sync)) -> Result<(), ExpectError> {
    let budget = RETRY_BUDGET.with(|cell| cell.take());
    let _restore = BudgetGuard(budget);

    let attempts = budget
        .map(|b| (b.as_millis() / POLL_INTERVAL.as_millis()) as u64)
        .unwrap_or(0)
        .max(1);

    for attempt in 1..=attempts {
        if f() {
            return Ok(());
        }
        if attempt < attempts {
            thread::sleep(POLL_INTERVAL);
        }
    }
    Err(ExpectError::Unmet(
        "block did not return a truthy value".to_string(),
    ))
}

// ---------------------------------------------------------------------------
// Process-wide switch for the soft form

static CHECKING: AtomicBool = AtomicBool::new(true);

/// Turns [`expect_soft`] checking on or off process-wide.
pub fn set_checking(enabled: bool) {
    CHECKING.store(enabled, Ordering::Relaxed);
}

/// Is [`expect_soft`] currently enforcing?
pub fn checking_enabled() -> bool {
    CHECKING.load(Ordering::Relaxed)
}
