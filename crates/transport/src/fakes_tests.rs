// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_transport_skip_then_update_tracks_latest_object() {
    let transport = FakeTransport::new();
    let manifest = Value::map_from([
        ("apiVersion".to_string(), Value::string("v1")),
        ("kind".to_string(), Value::string("Namespace")),
        (
            "metadata".to_string(),
            Value::map_from([("name".to_string(), Value::string("abc"))]),
        ),
    ]);
    transport.apply(&manifest, Operation::Create).await.unwrap();
    let gvk = Gvk::from_manifest(&manifest).unwrap();
    let fetched = transport.get(&gvk, None, "abc").await.unwrap();
    assert!(fetched.is_some());
    assert_eq!(transport.objects().len(), 1);
}

#[tokio::test]
async fn fake_event_source_tracks_ack_and_nack() {
    let source = FakeEventSource::new();
    source.ack("evt-1").await;
    source.nack("evt-2").await;
    assert_eq!(source.acked(), vec!["evt-1".to_string()]);
    assert_eq!(source.nacked(), vec!["evt-2".to_string()]);
}
