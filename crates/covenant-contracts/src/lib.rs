//! Design-by-contract annotations around method bodies.
//!
//! Contracts are declared separately from the body they guard and enforced
//! on every invocation. Two declaration styles share the same machinery:
//!
//! - Two-phase: [`declare`] queues annotations on the current thread;
//!   the next [`define`] on that thread consumes them.
//! - Definition-site: [`ContractedMethod::builder`] attaches annotations
//!   right where the body is defined.
//!
//! # Usage
//!
//! ```
//! use covenant_contracts::{declare, define, expects, returns, MethodSpec};
//! use covenant_core::Value;
//!
//! declare(expects([("a", 1)]));
//! declare(returns(6));
//! let sum = define(MethodSpec::instance("Foo", "sum", ["a", "b", "c"]), |inv| {
//!     let total = inv.args.iter().fold(0, |acc, v| match v {
//!         Value::Int(n) => acc + n,
//!         _ => acc,
//!     });
//!     Ok(Value::Int(total))
//! });
//!
//! let args = [Value::Int(1), Value::Int(2), Value::Int(3)];
//! assert_eq!(sum.invoke(None, &args).unwrap(), Value::Int(6));
//! ```
//!
//! Violations surface as [`ContractError`]s citing the qualified method
//! name, so a failure reads as a statement about the offending call.

pub mod annotations;
pub mod error;
pub mod method;
pub mod registry;

// Re-export commonly used types
pub use annotations::{
    expects, max_runtime, nothrow, returns, Annotation, ExpectsContract, HookSet,
    NothrowContract, ReturnsContract, RuntimeContract, ScopeValue,
};
pub use error::{BodyError, CallError, ContractError};
pub use method::{
    define, BodyFn, ContractBuilder, ContractedMethod, Invocation, MethodKind, MethodSpec,
    ParamSpec,
};
pub use registry::{consume, declare};
