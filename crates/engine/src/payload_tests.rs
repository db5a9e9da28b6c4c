// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::rc::Rc;

fn scope(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Rc<Scope> {
    Scope::root(Value::map_from(pairs.into_iter().map(|(k, v)| (k.to_string(), v))))
}

#[test]
fn expression_descriptor_preserves_integer_type() {
    let s = scope([("generation", Value::Int(5))]);
    let tree = Value::map_from([("expression".to_string(), Value::string("generation"))]);
    let result = realize(&tree, &s).unwrap();
    assert_eq!(result, Value::Int(5));
    assert_eq!(serde_json::to_string(&result).unwrap(), "5");
}

#[test]
fn field_descriptor_falls_back_to_default_when_absent() {
    let s = scope([]);
    let tree = Value::map_from([
        ("field".to_string(), Value::string("missing")),
        ("default".to_string(), Value::Int(0)),
    ]);
    assert_eq!(realize(&tree, &s).unwrap(), Value::Int(0));
}

#[test]
fn plain_map_recurses_and_renders_string_templates() {
    let s = scope([("name", Value::string("abc"))]);
    let tree = Value::map_from([(
        "labels".to_string(),
        Value::map_from([("app".to_string(), Value::string("{{ .name }}"))]),
    )]);
    let result = realize(&tree, &s).unwrap();
    assert_eq!(
        result.get_path("labels.app"),
        Some(&Value::String("abc".to_string()))
    );
}

#[test]
fn list_nodes_recurse_elementwise() {
    let s = scope([]);
    let tree = Value::List(vec![Value::Int(1), Value::Bool(true), Value::Null]);
    assert_eq!(realize(&tree, &s).unwrap(), tree);
}
