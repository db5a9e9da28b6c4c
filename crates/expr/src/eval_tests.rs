// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn root(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Rc<Scope> {
    Scope::root(Value::map_from(
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)),
    ))
}

#[test]
fn safe_access_never_raises_on_missing_chain() {
    let scope = root([("a", Value::map_from([("b".into(), Value::Null)]))]);
    let result = evaluate("a.?b.?c.orValue(42)", &scope).expect("evaluates");
    assert_eq!(result.value, Value::Int(42));
}

#[test]
fn has_reports_presence_without_raising() {
    let scope = root([("status", Value::map_from([]))]);
    let result = evaluate(r#"has(status.phase)"#, &scope).expect("evaluates");
    assert_eq!(result.value, Value::Bool(false));
}

#[test]
fn filter_and_size_on_list() {
    let conditions = Value::List(vec![
        Value::map_from([
            ("type".into(), Value::string("Ready")),
            ("status".into(), Value::string("True")),
        ]),
        Value::map_from([
            ("type".into(), Value::string("Progressing")),
            ("status".into(), Value::string("False")),
        ]),
    ]);
    let scope = root([("conditions", conditions)]);
    let result = evaluate(r#"conditions.filter(c, c.type == "Ready").size()"#, &scope)
        .expect("evaluates");
    assert_eq!(result.value, Value::Int(1));
}

#[test]
fn integer_division_by_zero_is_an_error_not_infinity() {
    let scope = root([]);
    let err = evaluate("1 / 0", &scope).unwrap_err();
    assert_eq!(err.kind, crate::error::ExprErrorKind::Division);
}

#[test]
fn float_division_by_zero_is_also_an_error() {
    let scope = root([]);
    let err = evaluate("1.0 / 0.0", &scope).unwrap_err();
    assert_eq!(err.kind, crate::error::ExprErrorKind::Division);
}

#[test]
fn numeric_overflow_is_reported() {
    let scope = root([]);
    let err = evaluate(&format!("{} + 1", i64::MAX), &scope).unwrap_err();
    assert_eq!(err.kind, crate::error::ExprErrorKind::Overflow);
}

#[test]
fn unresolved_field_without_safe_access_raises() {
    let scope = root([("a", Value::map_from([]))]);
    let err = evaluate("a.b", &scope).unwrap_err();
    assert_eq!(err.kind, crate::error::ExprErrorKind::MissingField);
}

#[test]
fn ternary_evaluates_only_the_taken_branch() {
    let scope = root([]);
    let result = evaluate("true ? 1 : (1 / 0)", &scope).expect("evaluates");
    assert_eq!(result.value, Value::Int(1));
}

#[test]
fn to_json_renders_numeric_leaves_without_quoting() {
    let scope = root([("replicas", Value::Int(3))]);
    let result = evaluate("toJson(replicas)", &scope).expect("evaluates");
    assert_eq!(result.value, Value::String("3".to_string()));
}
