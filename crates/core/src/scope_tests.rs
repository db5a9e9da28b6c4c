// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn child_shadows_root_binding() {
    let root = Scope::root(Value::map_from([("x".to_string(), Value::Int(1))]));
    let child = Scope::child(&root, "x", Value::Int(2));
    assert_eq!(child.lookup("x"), Some(&Value::Int(2)));
    assert_eq!(root.lookup("x"), Some(&Value::Int(1)));
}

#[test]
fn lookup_path_walks_nested_maps_past_the_top_level_name() {
    let root = Scope::root(Value::map_from([(
        "status".to_string(),
        Value::map_from([("phase".to_string(), Value::string("Ready"))]),
    )]));
    assert_eq!(
        root.lookup_path("status.phase"),
        Some(&Value::string("Ready"))
    );
    assert_eq!(root.lookup_path("missing.phase"), None);
}
