//! Behavioral tests for the matcher and the expectation facade, exercised
//! through the public API only.
//!
//! The universal matcher laws (literal reflexivity, element-wise semantics,
//! alternative semantics) run under proptest; the rest are fixed cases.

use proptest::prelude::*;

use covenant_core::{
    expect, match_value, matches, pair, truthy, ExpectError, Pattern, TypeTag, Value,
};

fn scalar_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        any::<i64>().prop_map(|n| Value::Float(n as f64)),
        "[a-z]{0,8}".prop_map(Value::Text),
    ]
}

proptest! {
    #[test]
    fn literal_matching_is_equality(v in scalar_value(), w in scalar_value()) {
        prop_assert!(matches(&v, &Pattern::Literal(v.clone())));
        prop_assert_eq!(matches(&v, &Pattern::Literal(w.clone())), v == w);
    }

    #[test]
    fn each_means_every_element(items in proptest::collection::vec(any::<i64>(), 0..8)) {
        let list = Value::List(items.iter().copied().map(Value::Int).collect());
        let all_even = items.iter().all(|n| n % 2 == 0);
        let even = Pattern::predicate(|v| matches!(v, Value::Int(n) if n % 2 == 0));
        prop_assert_eq!(matches(&list, &Pattern::each(even)), all_even);
    }

    #[test]
    fn one_of_means_any_alternative(n in any::<i64>(), choices in proptest::collection::vec(any::<i64>(), 1..6)) {
        let union = Pattern::one_of(choices.iter().copied().map(Pattern::from));
        prop_assert_eq!(matches(&Value::Int(n), &union), choices.contains(&n));
    }

    #[test]
    fn regex_never_matches_non_text(n in any::<i64>()) {
        let digits = Pattern::regex("^-?[0-9]+$").unwrap();
        prop_assert!(!matches(&Value::Int(n), &digits));
        prop_assert!(matches(&Value::Text(n.to_string()), &digits));
    }
}

#[test]
fn shape_checks_declared_keys_only() {
    let person = Value::map([("name", Value::from("ada")), ("age", Value::Int(36))]);
    let shape = Pattern::shape([("name", Pattern::Type(TypeTag::Text))]);
    // the undeclared "age" key is never looked at
    assert!(matches(&person, &shape));
}

#[test]
fn shape_treats_missing_keys_as_nil() {
    let empty = Value::Map(Default::default());
    assert!(matches(
        &empty,
        &Pattern::shape([("gone", Pattern::Type(TypeTag::Nil))]),
    ));
    assert!(!matches(
        &empty,
        &Pattern::shape([("gone", Pattern::Type(TypeTag::Text))]),
    ));
}

#[test]
fn mismatch_reports_innermost_pair_and_path() {
    let value = Value::map([("a", Value::map([("b", "c")]))]);
    let pattern = Pattern::shape([("a", Pattern::shape([("b", Pattern::from("d"))]))]);
    let err = match_value(&value, &pattern).unwrap_err();
    assert!(err
        .to_string()
        .contains("\"c\" does not match \"d\", at key b"));
}

#[test]
fn facade_reports_rendered_mismatch() {
    let options = Value::map([("foo", 1)]);
    let err = expect(&[pair(
        options,
        Pattern::shape([("foo", Pattern::Type(TypeTag::Text))]),
    )])
    .unwrap_err();
    assert_eq!(
        err,
        ExpectError::Unmet("1 does not match Text, at key foo".into())
    );
}

#[test]
fn facade_accepts_mixed_item_kinds() {
    assert!(expect(&[
        truthy(1),
        truthy("one"),
        pair("1", Pattern::regex("1").unwrap()),
    ])
    .is_ok());

    assert!(expect(&[truthy(1), truthy(Value::Nil)]).is_err());
    assert!(expect(&[truthy(1), pair(1, Pattern::regex("2").unwrap())]).is_err());
}
