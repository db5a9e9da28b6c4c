// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn object(name: &str, generation: i64) -> Value {
    Value::map_from([(
        "metadata".to_string(),
        Value::map_from([
            ("name".to_string(), Value::string(name)),
            (
                "annotations".to_string(),
                Value::map_from([(
                    reconadapter_recipe::GENERATION_ANNOTATION_KEY.to_string(),
                    Value::Int(generation),
                )]),
            ),
        ]),
    )])
}

#[test]
fn tiebreak_prefers_highest_generation_then_smallest_name() {
    let items = vec![object("zeta", 5), object("alpha", 5), object("beta", 3)];
    let chosen = tiebreak(items).unwrap();
    assert_eq!(chosen.get_path("metadata.name").and_then(Value::as_str), Some("alpha"));
}

#[test]
fn nested_discovery_matches_by_name_among_children() {
    let container = Value::map_from([(
        "children".to_string(),
        Value::List(vec![object("abc", 1), object("def", 1)]),
    )]);
    let found = nested_discover(&container, &RecipeDiscovery::ByName("abc".to_string()));
    assert!(found.is_some());
}

#[test]
fn nested_discovery_miss_is_none_not_an_error() {
    let container = Value::map_from([("children".to_string(), Value::List(vec![]))]);
    let found = nested_discover(&container, &RecipeDiscovery::ByName("missing".to_string()));
    assert!(found.is_none());
}
