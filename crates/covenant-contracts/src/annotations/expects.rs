//! Argument expectations, declared per parameter name.

use std::sync::Arc;

use indexmap::IndexMap;

use covenant_core::{match_value, Pattern};

use crate::error::ContractError;
use crate::method::{Invocation, MethodSpec};

/// Matches each provided argument against the pattern declared for its
/// parameter, if any. Parameters without a declared pattern are never
/// checked, and neither are optional parameters the caller left out.
#[derive(Debug, Clone)]
pub struct ExpectsContract {
    expectations: IndexMap<String, Pattern>,
    method: Option<Arc<MethodSpec>>,
    /// Pattern per parameter position, resolved once at bind time.
    by_position: Vec<Option<Pattern>>,
}

impl ExpectsContract {
    pub fn new<K, P, I>(expectations: I) -> ExpectsContract
    where
        K: Into<String>,
        P: Into<Pattern>,
        I: IntoIterator<Item = (K, P)>,
    {
        ExpectsContract {
            expectations: expectations
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
            method: None,
            by_position: Vec::new(),
        }
    }

    pub(crate) fn bind(&mut self, spec: &Arc<MethodSpec>) {
        self.by_position = spec
            .params
            .iter()
            .map(|param| self.expectations.get(&param.name).cloned())
            .collect();
        self.method = Some(spec.clone());
    }

    pub(crate) fn before_call(&self, inv: Invocation<'_>) -> Result<(), ContractError> {
        for (value, slot) in inv.args.iter().zip(&self.by_position) {
            let Some(pattern) = slot else { continue };
            if let Err(mismatch) = match_value(value, pattern) {
                return Err(ContractError::CallViolation {
                    method: self.method_name(),
                    detail: mismatch.to_string(),
                });
            }
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
