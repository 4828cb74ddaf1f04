//! Wall-clock runtime contracts.

use std::sync::Arc;
use std::time::{Duration, Instant};

use covenant_core::Value;

use crate::annotations::ScopeValue;
use crate::error::ContractError;
use crate::method::{Invocation, MethodSpec};

/// Measures each call's elapsed wall-clock time. Past `expected`, a warning
/// is logged; past `max` (when set), the call fails. Measurement happens
/// after the fact -- a running call is never preempted.
#[derive(Debug, Clone)]
pub struct RuntimeContract {
    expected: Duration,
    max: Option<Duration>,
    method: Option<Arc<MethodSpec>>,
}

impl RuntimeContract {
    /// Fails with [`ContractError::Configuration`] when `expected` exceeds
    /// `max`.
    pub fn new(expected: Duration, max: Option<Duration>) -> Result<RuntimeContract, ContractError> {
        if let Some(max) = max {
            if expected > max {
                return Err(ContractError::Configuration {
                    reason: format!(
                        "expected runtime {:?} exceeds the hard cap {:?}",
                        expected, max
                    ),
                });
            }
        }
        Ok(RuntimeContract {
            expected,
            max,
            method: None,
        })
    }

    pub(crate) fn bind(&mut self, spec: &Arc<MethodSpec>) {
        self.method = Some(spec.clone());
    }

    pub(crate) fn before_call(&self, _inv: Invocation<'_>) -> ScopeValue {
        ScopeValue::StartedAt(Instant::now())
    }

    pub(crate) fn after_call(
        &self,
        scope: Option<&ScopeValue>,
        _rv: &Value,
        _inv: Invocation<'_>,
    ) -> Result<(), ContractError> {
        let Some(ScopeValue::StartedAt(started)) = scope else {
            return Ok(());
        };
        let elapsed = started.elapsed();

        if let Some(max) = self.max {
            if elapsed >= max {
                return Err(ContractError::RuntimeExceeded {
                    method: self.method_name(),
                    elapsed,
                    max,
                });
            }
        }
        if elapsed >= self.expected {
            tracing::warn!(
                "`{}` took longer than expected: {:.2?} > {:.2?}",
                self.method_name(),
                elapsed,
                self.expected
            );
        }
        Ok(())
    }

    fn method_name(&self) -> String {
        self.method
            .as_ref()
            .map(|spec| spec.qualified_name())
            .unwrap_or_default()
    }
}
