//! Recursive matching of values against patterns.
//!
//! Pure and stateless: nothing is retained between calls, so matching is
//! safe from any number of threads. The only side effects are the ones a
//! caller-supplied [`Pattern::Predicate`] chooses to perform.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pattern::Pattern;
use crate::value::Value;

/// Where inside a compound value a mismatch occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathSeg {
    /// List element position, for [`Pattern::Each`] failures.
    Index(usize),
    /// Map key, for [`Pattern::Shape`] failures.
    Key(String),
}

/// Structured evidence that a value failed a pattern.
///
/// Carries the innermost failing value/pattern pair plus the index or key it
/// failed at. Diagnostic only; it never feeds back into matching.
#[derive(Debug, Clone)]
pub struct Mismatch {
    pub value: Value,
    pub pattern: Pattern,
    pub path: Option<PathSeg>,
}

impl Mismatch {
    fn new(value: &Value, pattern: &Pattern, path: Option<PathSeg>) -> Mismatch {
        Mismatch {
            value: value.clone(),
            pattern: pattern.clone(),
            path,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} does not match {}", self.value, self.pattern)?;
        match &self.path {
            None => Ok(()),
            Some(PathSeg::Index(idx)) => write!(f, ", at index {}", idx),
            Some(PathSeg::Key(key)) => write!(f, ", at key {}", key),
        }
    }
}

impl std::error::Error for Mismatch {}

static NIL: Value = Value::Nil;

/// Does `value` satisfy `pattern`? Side-effect-free probe (modulo predicate
/// patterns).
pub fn matches(value: &Value, pattern: &Pattern) -> bool {
    match_value(value, pattern).is_ok()
}

/// Matches `value` against `pattern`, reporting the innermost failure.
pub fn match_value(value: &Value, pattern: &Pattern) -> Result<(), Mismatch> {
    match_at(value, pattern, None)
}

/// The recursive worker. `path` is the position this value occupies inside
/// the enclosing compound, used only if the failure happens at this level;
/// deeper failures bubble up with their own path untouched.
fn match_at(value: &Value, pattern: &Pattern, path: Option<PathSeg>) -> Result<(), Mismatch> {
    let ok = match pattern {
        Pattern::Truthy => value.truthy(),
        Pattern::Never => false,
        Pattern::Literal(expected) => value == expected,
        Pattern::Type(tag) => tag.admits(value),
        Pattern::Regex(re) => match value {
            Value::Text(s) => re.is_match(s),
            _ => false,
        },
        Pattern::Range(range) => range.admits(value),
        Pattern::Predicate(f) => f.accepts(value),
        Pattern::Each(element) => {
            let Value::List(items) = value else {
                return Err(Mismatch::new(value, pattern, path));
            };
            for (idx, item) in items.iter().enumerate() {
                match_at(item, element, Some(PathSeg::Index(idx)))?;
            }
            true
        }
        Pattern::OneOf(alternatives) => {
            if alternatives.iter().any(|alt| matches(value, alt)) {
                true
            } else {
                // None matched: report the last attempted alternative at
                // the union's own position, no refinement into branches.
                let last = alternatives.last().cloned().unwrap_or(Pattern::Never);
                return Err(Mismatch {
                    value: value.clone(),
                    pattern: last,
                    path,
                });
            }
        }
        Pattern::Shape(fields) => {
            let Value::Map(entries) = value else {
                return Err(Mismatch::new(value, pattern, path));
            };
            for (key, sub) in fields {
                let entry = entries.get(key).unwrap_or(&NIL);
                match_at(entry, sub, Some(PathSeg::Key(key.clone())))?;
            }
            true
        }
    };

    if ok {
        Ok(())
    } else {
        Err(Mismatch::new(value, pattern, path))
    }
}
