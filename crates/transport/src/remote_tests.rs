// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Mutex;

struct RecordingPublisher {
    replies: Mutex<Vec<Value>>,
    requests: Mutex<Vec<Value>>,
}

#[async_trait]
impl BusPublisher for RecordingPublisher {
    async fn publish(&self, envelope: Value) -> Result<Value, TransportError> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(envelope);
        Ok(self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop()
            .unwrap_or(Value::Null))
    }
}

#[tokio::test]
async fn apply_envelope_carries_the_resulting_object() {
    let publisher = RecordingPublisher {
        replies: Mutex::new(vec![Value::map_from([(
            "resultingObject".to_string(),
            Value::string("applied"),
        )])]),
        requests: Mutex::new(Vec::new()),
    };
    let transport = RemoteDispatchTransport::new(publisher);
    let manifest = Value::map_from([
        ("apiVersion".to_string(), Value::string("v1")),
        ("kind".to_string(), Value::string("Namespace")),
    ]);
    let outcome = transport.apply(&manifest, Operation::Create).await.unwrap();
    assert_eq!(outcome.resulting_object, Value::string("applied"));
}
