//! The method interceptor: wraps a body with its bound annotations.
//!
//! A definition event ([`define`]) consumes the pending annotation queue,
//! binds each annotation to the new method, partitions them into
//! before/after/exception hook lists -- once, not per call -- and returns a
//! [`ContractedMethod`] wrapper. Each invocation then drives the hooks
//! around exactly one call of the original body.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use covenant_core::Value;

use crate::annotations::{Annotation, ScopeValue};
use crate::error::{BodyError, CallError, ContractError};
use crate::registry;

/// Instance-level vs type-level method, for qualified-name rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MethodKind {
    Instance,
    Type,
}

/// A declared parameter of a contracted method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    /// Optional parameters widen the accepted argument count; callers may
    /// leave them out.
    pub required: bool,
}

impl ParamSpec {
    pub fn required(name: impl Into<String>) -> ParamSpec {
        ParamSpec {
            name: name.into(),
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>) -> ParamSpec {
        ParamSpec {
            name: name.into(),
            required: false,
        }
    }
}

/// Identity and signature of a method under contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub owner: String,
    pub name: String,
    pub kind: MethodKind,
    pub params: Vec<ParamSpec>,
}

impl MethodSpec {
    /// An instance method with all-required parameters.
    pub fn instance<'a>(
        owner: impl Into<String>,
        name: impl Into<String>,
        params: impl IntoIterator<Item = &'a str>,
    ) -> MethodSpec {
        MethodSpec {
            owner: owner.into(),
            name: name.into(),
            kind: MethodKind::Instance,
            params: params.into_iter().map(ParamSpec::required).collect(),
        }
    }

    /// A type-level method with all-required parameters.
    pub fn type_level<'a>(
        owner: impl Into<String>,
        name: impl Into<String>,
        params: impl IntoIterator<Item = &'a str>,
    ) -> MethodSpec {
        MethodSpec {
            owner: owner.into(),
            name: name.into(),
            kind: MethodKind::Type,
            params: params.into_iter().map(ParamSpec::required).collect(),
        }
    }

    /// `Owner#name` for instance methods, `Owner.name` for type-level ones.
    pub fn qualified_name(&self) -> String {
        match self.kind {
            MethodKind::Instance => format!("{}#{}", self.owner, self.name),
            MethodKind::Type => format!("{}.{}", self.owner, self.name),
        }
    }

    /// Accepted argument count as (required, total).
    fn arity(&self) -> (usize, usize) {
        let required = self.params.iter().filter(|p| p.required).count();
        (required, self.params.len())
    }
}

/// Arguments of one call to a contracted method.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub receiver: Option<&'a Value>,
    pub args: &'a [Value],
}

/// A contracted method body.
pub type BodyFn = dyn Fn(Invocation<'_>) -> Result<Value, BodyError> + Send + Sync;

/// A method wrapped with its annotations. One wrapper per method; it lives
/// as long as the method itself and may be invoked from any thread.
pub struct ContractedMethod {
    spec: Arc<MethodSpec>,
    body: Box<BodyFn>,
    annotations: Vec<Annotation>,
    // hook membership, partitioned once at wrap time
    before: Vec<usize>,
    after: Vec<usize>,
    exception: Vec<usize>,
}

impl fmt::Debug for ContractedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractedMethod")
            .field("spec", &self.spec)
            .field("annotations", &self.annotations.len())
            .finish()
    }
}

/// Definition event: consumes this thread's pending annotations and wraps
/// `body` with them. An empty queue produces a plain pass-through wrapper.
pub fn define(
    spec: MethodSpec,
    body: impl Fn(Invocation<'_>) -> Result<Value, BodyError> + Send + Sync + 'static,
) -> ContractedMethod {
    let annotations = registry::consume().unwrap_or_default();
    ContractedMethod::new(spec, annotations, Box::new(body))
}

impl ContractedMethod {
    /// Definition-site alternative to `declare` + [`define`]: collect
    /// annotations right where the body is defined, with no thread-local
    /// step and no orphaned-queue failure mode.
    pub fn builder(spec: MethodSpec) -> ContractBuilder {
        ContractBuilder {
            spec,
            annotations: Vec::new(),
        }
    }

    fn new(spec: MethodSpec, mut annotations: Vec<Annotation>, body: Box<BodyFn>) -> Self {
        let spec = Arc::new(spec);

        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut exception = Vec::new();
        for (idx, annotation) in annotations.iter_mut().enumerate() {
            annotation.bind(&spec);
            let hooks = annotation.hooks();
            if hooks.before {
                before.push(idx);
            }
            if hooks.after {
                after.push(idx);
            }
            if hooks.exception {
                exception.push(idx);
            }
        }

        ContractedMethod {
            spec,
            body,
            annotations,
            before,
            after,
            exception,
        }
    }

    pub fn spec(&self) -> &MethodSpec {
        &self.spec
    }

    /// Invokes the wrapped method: arity check, before hooks in declared
    /// order, the body exactly once, then after hooks (normal return) or
    /// exception hooks (body error, re-raised unless a hook supersedes it).
    pub fn invoke(&self, receiver: Option<&Value>, args: &[Value]) -> Result<Value, CallError> {
        self.check_arity(args)?;

        let inv = Invocation { receiver, args };

        // Scopes are per invocation, allocated only when some before hook
        // actually produces one; most hooks are stateless.
        let mut scopes: Option<Vec<(usize, ScopeValue)>> = None;
        for &idx in &self.before {
            if let Some(scope) = self.annotations[idx].before_call(inv)? {
                scopes.get_or_insert_with(Vec::new).push((idx, scope));
            }
        }

        match (self.body)(inv) {
            Ok(rv) => {
                for &idx in &self.after {
                    self.annotations[idx].after_call(scope_for(&scopes, idx), &rv, inv)?;
                }
                Ok(rv)
            }
            Err(exc) => {
                for &idx in &self.exception {
                    self.annotations[idx].on_exception(scope_for(&scopes, idx), &exc, inv)?;
                }
                Err(CallError::Raised(exc))
            }
        }
    }

    fn check_arity(&self, args: &[Value]) -> Result<(), ContractError> {
        let (min, max) = self.spec.arity();
        if args.len() < min || args.len() > max {
            return Err(ContractError::ArgumentCount {
                method: self.spec.qualified_name(),
                min,
                max,
                actual: args.len(),
            });
        }
        Ok(())
    }
}

fn scope_for<'a>(
    scopes: &'a Option<Vec<(usize, ScopeValue)>>,
    annotation_idx: usize,
) -> Option<&'a ScopeValue> {
    scopes
        .as_ref()?
        .iter()
        .find(|(idx, _)| *idx == annotation_idx)
        .map(|(_, scope)| scope)
}

/// Collects annotations at the definition site; see
/// [`ContractedMethod::builder`].
pub struct ContractBuilder {
    spec: MethodSpec,
    annotations: Vec<Annotation>,
}

impl ContractBuilder {
    pub fn with(mut self, annotation: Annotation) -> ContractBuilder {
        self.annotations.push(annotation);
        self
    }

    pub fn define(
        self,
        body: impl Fn(Invocation<'_>) -> Result<Value, BodyError> + Send + Sync + 'static,
    ) -> ContractedMethod {
        ContractedMethod::new(self.spec, self.annotations, Box::new(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{expects, returns};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn passthrough(spec: MethodSpec) -> ContractedMethod {
        ContractedMethod::builder(spec)
            .define(|inv| Ok(inv.args.first().cloned().unwrap_or(Value::Nil)))
    }

    #[test]
    fn qualified_names() {
        assert_eq!(
            MethodSpec::instance("Foo", "bar", ["a"]).qualified_name(),
            "Foo#bar"
        );
        assert_eq!(
            MethodSpec::type_level("Foo", "bar", ["a"]).qualified_name(),
            "Foo.bar"
        );
    }

    #[test]
    fn arity_accepts_optional_ranges() {
        let spec = MethodSpec {
            owner: "Foo".into(),
            name: "pad".into(),
            kind: MethodKind::Instance,
            params: vec![ParamSpec::required("a"), ParamSpec::optional("b")],
        };
        let method = passthrough(spec);

        assert!(method.invoke(None, &[Value::Int(1)]).is_ok());
        assert!(method
            .invoke(None, &[Value::Int(1), Value::Int(2)])
            .is_ok());

        let err = method.invoke(None, &[]).unwrap_err();
        assert!(matches!(
            err.as_contract(),
            Some(ContractError::ArgumentCount { actual: 0, .. })
        ));
        let err = method
            .invoke(None, &[Value::Int(1), Value::Int(2), Value::Int(3)])
            .unwrap_err();
        assert!(matches!(
            err.as_contract(),
            Some(ContractError::ArgumentCount { actual: 3, .. })
        ));
    }

    #[test]
    fn body_runs_exactly_once_per_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let method = ContractedMethod::builder(MethodSpec::instance("Foo", "bump", ["a"]))
            .with(returns(0..=100))
            .define(move |inv| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(inv.args[0].clone())
            });

        method.invoke(None, &[Value::Int(1)]).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // a failing after hook still means the body ran once
        method.invoke(None, &[Value::Int(999)]).unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failing_before_hook_vetoes_the_body() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let method = ContractedMethod::builder(MethodSpec::instance("Foo", "bar", ["a"]))
            .with(expects([("a", 1)]))
            .define(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(Value::Nil)
            });

        method.invoke(None, &[Value::Int(2)]).unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn receiver_is_forwarded_to_the_body() {
        let method = ContractedMethod::builder(MethodSpec::instance("Foo", "me", []))
            .define(|inv| Ok(inv.receiver.cloned().unwrap_or(Value::Nil)));

        let receiver = Value::from("self");
        assert_eq!(
            method.invoke(Some(&receiver), &[]).unwrap(),
            Value::from("self")
        );
    }
}
