// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample_event() -> AdapterEvent {
    serde_json::from_value(serde_json::json!({
        "specversion": "1.0",
        "id": "evt-1",
        "type": "cluster.updated",
        "source": "control-plane",
        "data": {
            "id": "abc",
            "kind": "Cluster",
            "href": "/clusters/abc",
            "generation": 5,
        }
    }))
    .expect("fixture event deserializes")
}

#[test]
fn accessors_read_well_known_fields() {
    let evt = sample_event();
    assert_eq!(evt.data.id(), Some("abc"));
    assert_eq!(evt.data.kind(), Some("Cluster"));
    assert_eq!(evt.data.generation(), Some(5));
}

#[test]
fn dotted_path_reads_nested_fields() {
    let evt: AdapterEvent = serde_json::from_value(serde_json::json!({
        "specversion": "1.0",
        "id": "evt-2",
        "type": "cluster.updated",
        "source": "control-plane",
        "data": { "owned_reference": { "kind": "Cluster", "name": "abc" } }
    }))
    .expect("fixture event deserializes");
    assert_eq!(
        evt.data.get_path("owned_reference.kind").and_then(Value::as_str),
        Some("Cluster")
    );
}
