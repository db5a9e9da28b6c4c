// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote-dispatch transport: wraps manifests into a bus envelope instead
//! of applying them directly.
//!
//! Grounded on the teacher's `Effect::Emit`/`SendToAgent` shape in
//! `oj-engine/src/executor.rs`: the transport does not perform the apply
//! itself, it hands a structured envelope to a [`BusPublisher`] and waits
//! for the envelope the publisher hands back (which, for a remote apply
//! worker, carries the resulting object plus any nested-resource feedback
//! values spec §4.7 describes).

use async_trait::async_trait;
use reconadapter_core::Value;

use crate::error::TransportError;
use crate::transport::{ApplyOutcome, Gvk, Operation, Selector, Transport};

/// Publishes one envelope and returns the reply envelope. The bus itself
/// (its topic naming, framing, delivery guarantees) is outside this
/// crate's scope per spec §1 non-goals.
#[async_trait]
pub trait BusPublisher: Send + Sync {
    async fn publish(&self, envelope: Value) -> Result<Value, TransportError>;
}

pub struct RemoteDispatchTransport<P> {
    publisher: P,
}

impl<P: BusPublisher> RemoteDispatchTransport<P> {
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    fn envelope(action: &str, manifest: &Value, operation: Option<Operation>) -> Value {
        let mut fields = indexmap::IndexMap::new();
        fields.insert("action".to_string(), Value::string(action));
        fields.insert("manifest".to_string(), manifest.clone());
        if let Some(op) = operation {
            fields.insert("operation".to_string(), Value::string(operation_label(op)));
        }
        Value::Map(fields)
    }
}

fn operation_label(op: Operation) -> &'static str {
    match op {
        Operation::Create => "create",
        Operation::Update => "update",
        Operation::Skip => "skip",
        Operation::Recreate => "recreate",
    }
}

#[async_trait]
impl<P: BusPublisher> Transport for RemoteDispatchTransport<P> {
    async fn apply(&self, manifest: &Value, operation: Operation) -> Result<ApplyOutcome, TransportError> {
        let reply = self
            .publisher
            .publish(Self::envelope("apply", manifest, Some(operation)))
            .await?;
        let resulting_object = reply
            .get_path("resultingObject")
            .cloned()
            .unwrap_or(Value::Null);
        Ok(ApplyOutcome { operation, resulting_object })
    }

    async fn get(&self, gvk: &Gvk, namespace: Option<&str>, name: &str) -> Result<Option<Value>, TransportError> {
        let request = Value::map_from([
            ("action".to_string(), Value::string("get")),
            ("group".to_string(), Value::string(gvk.group.clone())),
            ("version".to_string(), Value::string(gvk.version.clone())),
            ("kind".to_string(), Value::string(gvk.kind.clone())),
            (
                "namespace".to_string(),
                namespace.map(Value::string).unwrap_or(Value::Null),
            ),
            ("name".to_string(), Value::string(name)),
        ]);
        let reply = self.publisher.publish(request).await?;
        match reply.get_path("found").and_then(Value::as_bool) {
            Some(false) | None => Ok(None),
            Some(true) => Ok(Some(reply.get_path("object").cloned().unwrap_or(Value::Null))),
        }
    }

    async fn discover(&self, selector: &Selector) -> Result<Vec<Value>, TransportError> {
        let request = Value::map_from([
            ("action".to_string(), Value::string("discover")),
            ("group".to_string(), Value::string(selector.gvk.group.clone())),
            ("version".to_string(), Value::string(selector.gvk.version.clone())),
            ("kind".to_string(), Value::string(selector.gvk.kind.clone())),
            ("labelSelector".to_string(), Value::string(selector.label_selector.clone())),
            (
                "namespace".to_string(),
                selector.namespace.clone().map(Value::string).unwrap_or(Value::Null),
            ),
        ]);
        let reply = self.publisher.publish(request).await?;
        Ok(reply
            .get_path("items")
            .and_then(Value::as_list)
            .map(<[Value]>::to_vec)
            .unwrap_or_default())
    }

    async fn delete(&self, gvk: &Gvk, namespace: Option<&str>, name: &str) -> Result<(), TransportError> {
        let request = Value::map_from([
            ("action".to_string(), Value::string("delete")),
            ("group".to_string(), Value::string(gvk.group.clone())),
            ("version".to_string(), Value::string(gvk.version.clone())),
            ("kind".to_string(), Value::string(gvk.kind.clone())),
            (
                "namespace".to_string(),
                namespace.map(Value::string).unwrap_or(Value::Null),
            ),
            ("name".to_string(), Value::string(name)),
        ]);
        self.publisher.publish(request).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
