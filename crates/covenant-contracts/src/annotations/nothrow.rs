//! The no-exceptions-allowed contract.

use std::sync::Arc;

use crate::error::{BodyError, ContractError};
use crate::method::{Invocation, MethodSpec};

/// Converts any error escaping the body into a contract violation carrying
/// the original error's message verbatim. The body's error never propagates
/// unannotated.
#[derive(Debug, Clone, Default)]
pub struct NothrowContract {
    method: Option<Arc<MethodSpec>>,
}

impl NothrowContract {
    pub fn new() -> NothrowContract {
        NothrowContract { method: None }
    }

    pub(crate) fn bind(&mut self, spec: &Arc<MethodSpec>) {
        self.method = Some(spec.clone());
    }

    pub(crate) fn on_exception(
        &self,
        error: &BodyError,
        _inv: Invocation<'_>,
    ) -> Result<(), ContractError> {
        Err(ContractError::UnexpectedException {
            method: self
                .method
                .as_ref()
                .map(|spec| spec.qualified_name())
                .unwrap_or_default(),
            message: error.to_string(),
        })
    }
}
