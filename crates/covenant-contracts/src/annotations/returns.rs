//! Return-value expectations.

use std::sync::Arc;

use covenant_core::{match_value, Pattern, Value};

use crate::error::ContractError;
use crate::method::{Invocation, MethodSpec};

/// Matches the return value against a single declared pattern. Observes
/// only; the invocation's result is always the body's return value.
#[derive(Debug, Clone)]
pub struct ReturnsContract {
    pattern: Pattern,
    method: Option<Arc<MethodSpec>>,
}

impl ReturnsContract {
    pub fn new(pattern: impl Into<Pattern>) -> ReturnsContract {
        ReturnsContract {
            pattern: pattern.into(),
            method: None,
        }
    }

    pub(crate) fn bind(&mut self, spec: &Arc<MethodSpec>) {
        self.method = Some(spec.clone());
    }

    pub(crate) fn after_call(&self, rv: &Value, _inv: Invocation<'_>) -> Result<(), ContractError> {
        match_value(rv, &self.pattern).map_err(|mismatch| ContractError::ReturnViolation {
            method: self
                .method
                .as_ref()
                .map(|spec| spec.qualified_name())
                .unwrap_or_default(),
            detail: mismatch.to_string(),
        })
    }
}
