//! The expectation pattern vocabulary.
//!
//! A [`Pattern`] is a declarative description of acceptable values. Element-
//! wise and alternative-style sequence patterns are distinct constructors
//! ([`Pattern::Each`] vs [`Pattern::OneOf`]); a one-element `OneOf` means
//! "one of one", never "for all".

use std::fmt;
use std::ops::{BitOr, Range, RangeInclusive};
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;

use crate::error::ExpectError;
use crate::value::Value;

/// Type membership tags for [`Pattern::Type`].
///
/// `Number` admits both `Int` and `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TypeTag {
    Nil,
    Bool,
    Int,
    Float,
    Number,
    Text,
    List,
    Map,
}

impl TypeTag {
    /// Is `value` a member of this type?
    pub fn admits(&self, value: &Value) -> bool {
        match (self, value) {
            (TypeTag::Nil, Value::Nil) => true,
            (TypeTag::Bool, Value::Bool(_)) => true,
            (TypeTag::Int, Value::Int(_)) => true,
            (TypeTag::Float, Value::Float(_)) => true,
            (TypeTag::Number, Value::Int(_) | Value::Float(_)) => true,
            (TypeTag::Text, Value::Text(_)) => true,
            (TypeTag::List, Value::List(_)) => true,
            (TypeTag::Map, Value::Map(_)) => true,
            _ => false,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            TypeTag::Nil => "Nil",
            TypeTag::Bool => "Bool",
            TypeTag::Int => "Int",
            TypeTag::Float => "Float",
            TypeTag::Number => "Number",
            TypeTag::Text => "Text",
            TypeTag::List => "List",
            TypeTag::Map => "Map",
        }
    }
}

/// An arbitrary caller-supplied predicate.
///
/// The nullary form is invoked without the value; it probes ambient state
/// and backs the facade's trailing-block escape hatch. The unary form
/// receives the value under check.
#[derive(Clone)]
pub enum PredicateFn {
    Nullary(Arc<dyn Fn() -> bool + Send + Sync>),
    Unary(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl PredicateFn {
    /// Apply the predicate to `value`. Nullary predicates ignore it.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            PredicateFn::Nullary(f) => f(),
            PredicateFn::Unary(f) => f(value),
        }
    }
}

impl fmt::Debug for PredicateFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredicateFn::Nullary(_) => write!(f, "PredicateFn::Nullary"),
            PredicateFn::Unary(_) => write!(f, "PredicateFn::Unary"),
        }
    }
}

/// Ordinal bounds for [`Pattern::Range`]. Either end may be open.
#[derive(Debug, Clone)]
pub struct RangePattern {
    pub min: Option<Value>,
    pub max: Option<Value>,
    /// Whether the upper bound itself is admitted (`..=` vs `..`).
    pub inclusive: bool,
}

impl RangePattern {
    /// Is `value` within bounds? Values not ordered against the bounds
    /// (wrong kind) are simply out of range.
    pub fn admits(&self, value: &Value) -> bool {
        if let Some(min) = &self.min {
            match value.ordinal_cmp(min) {
                Some(ord) if ord.is_ge() => {}
                _ => return false,
            }
        }
        if let Some(max) = &self.max {
            match value.ordinal_cmp(max) {
                Some(ord) if ord.is_lt() || (self.inclusive && ord.is_eq()) => {}
                _ => return false,
            }
        }
        true
    }
}

/// A declarative description of acceptable values.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Value must equal the literal.
    Literal(Value),
    /// Value must be a member of the tagged type.
    Type(TypeTag),
    /// Value must be text and match the expression. Non-text mismatches,
    /// it never errors.
    Regex(Regex),
    /// Value must be ordinally within bounds.
    Range(RangePattern),
    /// Value accepted iff the predicate returns true.
    Predicate(PredicateFn),
    /// Accept any truthy value.
    Truthy,
    /// Reject everything.
    Never,
    /// Accept iff any alternative matches.
    OneOf(Vec<Pattern>),
    /// Value must be a list and every element must match.
    Each(Box<Pattern>),
    /// Value must be a map; each declared key's entry must match, in
    /// declaration order. Extra keys are ignored; missing keys check as nil.
    Shape(IndexMap<String, Pattern>),
}

impl Pattern {
    /// Compiles `source` into a regex pattern.
    pub fn regex(source: &str) -> Result<Pattern, ExpectError> {
        Regex::new(source)
            .map(Pattern::Regex)
            .map_err(|e| ExpectError::InvalidPattern(e.to_string()))
    }

    /// Element-wise list pattern: every element must match `element`.
    pub fn each(element: impl Into<Pattern>) -> Pattern {
        Pattern::Each(Box::new(element.into()))
    }

    /// Alternative pattern: any of `alternatives` must match.
    pub fn one_of<P, I>(alternatives: I) -> Pattern
    where
        P: Into<Pattern>,
        I: IntoIterator<Item = P>,
    {
        Pattern::OneOf(alternatives.into_iter().map(Into::into).collect())
    }

    /// Per-key map pattern, keys checked in the given order.
    pub fn shape<K, P, I>(fields: I) -> Pattern
    where
        K: Into<String>,
        P: Into<Pattern>,
        I: IntoIterator<Item = (K, P)>,
    {
        Pattern::Shape(
            fields
                .into_iter()
                .map(|(k, p)| (k.into(), p.into()))
                .collect(),
        )
    }

    /// Predicate over the value under check.
    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Pattern {
        Pattern::Predicate(PredicateFn::Unary(Arc::new(f)))
    }

    /// Predicate over ambient state; the value under check is ignored.
    pub fn ambient(f: impl Fn() -> bool + Send + Sync + 'static) -> Pattern {
        Pattern::Predicate(PredicateFn::Nullary(Arc::new(f)))
    }

    /// Ordinal range with explicit bounds.
    pub fn range(min: Option<Value>, max: Option<Value>, inclusive: bool) -> Pattern {
        Pattern::Range(RangePattern {
            min,
            max,
            inclusive,
        })
    }
}

impl From<Value> for Pattern {
    fn from(v: Value) -> Pattern {
        Pattern::Literal(v)
    }
}

impl From<TypeTag> for Pattern {
    fn from(t: TypeTag) -> Pattern {
        Pattern::Type(t)
    }
}

impl From<bool> for Pattern {
    fn from(b: bool) -> Pattern {
        Pattern::Literal(Value::Bool(b))
    }
}

impl From<i64> for Pattern {
    fn from(n: i64) -> Pattern {
        Pattern::Literal(Value::Int(n))
    }
}

impl From<i32> for Pattern {
    fn from(n: i32) -> Pattern {
        Pattern::Literal(Value::Int(n as i64))
    }
}

impl From<f64> for Pattern {
    fn from(n: f64) -> Pattern {
        Pattern::Literal(Value::Float(n))
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Pattern {
        Pattern::Literal(Value::Text(s.to_string()))
    }
}

impl From<Range<i64>> for Pattern {
    fn from(r: Range<i64>) -> Pattern {
        Pattern::range(Some(Value::Int(r.start)), Some(Value::Int(r.end)), false)
    }
}

impl From<RangeInclusive<i64>> for Pattern {
    fn from(r: RangeInclusive<i64>) -> Pattern {
        Pattern::range(
            Some(Value::Int(*r.start())),
            Some(Value::Int(*r.end())),
            true,
        )
    }
}

/// `a | b` builds (or extends) a [`Pattern::OneOf`] union.
impl BitOr for Pattern {
    type Output = Pattern;

    fn bitor(self, rhs: Pattern) -> Pattern {
        match self {
            Pattern::OneOf(mut alternatives) => {
                alternatives.push(rhs);
                Pattern::OneOf(alternatives)
            }
            lhs => Pattern::OneOf(vec![lhs, rhs]),
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pattern::Literal(v) => write!(f, "{}", v),
            Pattern::Type(t) => write!(f, "{}", t.name()),
            Pattern::Regex(re) => write!(f, "/{}/", re.as_str()),
            Pattern::Range(range) => {
                if let Some(min) = &range.min {
                    write!(f, "{}", min)?;
                }
                write!(f, "{}", if range.inclusive { "..=" } else { ".." })?;
                if let Some(max) = &range.max {
                    write!(f, "{}", max)?;
                }
                Ok(())
            }
            Pattern::Predicate(_) => write!(f, "<predicate>"),
            Pattern::Truthy => write!(f, "truthy"),
            Pattern::Never => write!(f, "fail"),
            Pattern::OneOf(alternatives) => {
                write!(f, "(")?;
                for (idx, alt) in alternatives.iter().enumerate() {
                    if idx > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", alt)?;
                }
                write!(f, ")")
            }
            Pattern::Each(element) => write!(f, "[{}]", element),
            Pattern::Shape(fields) => {
                write!(f, "{{")?;
                for (idx, (key, sub)) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, sub)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_admit_members() {
        assert!(TypeTag::Int.admits(&Value::Int(1)));
        assert!(TypeTag::Number.admits(&Value::Float(1.0)));
        assert!(!TypeTag::Float.admits(&Value::Int(1)));
        assert!(TypeTag::Nil.admits(&Value::Nil));
    }

    #[test]
    fn range_bounds() {
        let half_open: Pattern = (0..2).into();
        let Pattern::Range(range) = &half_open else {
            panic!("expected range")
        };
        assert!(range.admits(&Value::Int(0)));
        assert!(range.admits(&Value::Int(1)));
        assert!(!range.admits(&Value::Int(2)));
        assert!(!range.admits(&Value::Text("x".into())));

        let inclusive: Pattern = (0..=2).into();
        let Pattern::Range(range) = &inclusive else {
            panic!("expected range")
        };
        assert!(range.admits(&Value::Int(2)));
    }

    #[test]
    fn bitor_builds_and_extends_unions() {
        let union = Pattern::from(1) | Pattern::from("a") | Pattern::Type(TypeTag::Nil);
        let Pattern::OneOf(alternatives) = union else {
            panic!("expected union")
        };
        assert_eq!(alternatives.len(), 3);
    }

    #[test]
    fn display_renders_diagnostic_forms() {
        assert_eq!(Pattern::from(1).to_string(), "1");
        assert_eq!(Pattern::regex("^a").unwrap().to_string(), "/^a/");
        assert_eq!(Pattern::from(0..5).to_string(), "0..5");
        assert_eq!(Pattern::each(TypeTag::Int).to_string(), "[Int]");
        assert_eq!(
            Pattern::one_of([Pattern::from(1), Pattern::from(2)]).to_string(),
            "(1 | 2)"
        );
        assert_eq!(
            Pattern::shape([("a", Pattern::from("x"))]).to_string(),
            "{a: \"x\"}"
        );
    }
}
