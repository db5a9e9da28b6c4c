// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory test doubles for every external-interface trait, gated behind
//! `test-support` exactly like the teacher's `oj-adapters` fakes
//! (`FakeSessionAdapter`, `FakeAgentAdapter`): canned responses plus a
//! recorded call log callers assert against.
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use reconadapter_core::{AdapterEvent, Value};

use crate::api_client::{ApiRequest, ApiResponse, APIClient};
use crate::error::{SourceError, TransportError};
use crate::event_source::EventSource;
use crate::secret_store::{ConfigMapStore, SecretStore};
use crate::transport::{ApplyOutcome, Gvk, Operation, Selector, Transport};

/// Queues canned [`AdapterEvent`]s and records ack/nack calls by event id.
#[derive(Default)]
pub struct FakeEventSource {
    inner: Mutex<FakeEventSourceState>,
}

#[derive(Default)]
struct FakeEventSourceState {
    queue: VecDeque<AdapterEvent>,
    acked: Vec<String>,
    nacked: Vec<String>,
}

impl FakeEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: AdapterEvent) {
        self.inner.lock().queue.push_back(event);
    }

    pub fn acked(&self) -> Vec<String> {
        self.inner.lock().acked.clone()
    }

    pub fn nacked(&self) -> Vec<String> {
        self.inner.lock().nacked.clone()
    }
}

#[async_trait]
impl EventSource for FakeEventSource {
    async fn recv(&self) -> Result<Option<AdapterEvent>, SourceError> {
        Ok(self.inner.lock().queue.pop_front())
    }

    async fn ack(&self, id: &str) {
        self.inner.lock().acked.push(id.to_string());
    }

    async fn nack(&self, id: &str) {
        self.inner.lock().nacked.push(id.to_string());
    }
}

/// Returns canned responses (or a canned error) in FIFO order, one per
/// `do_request` call, and records every request it was asked to send.
#[derive(Default)]
pub struct FakeApiClient {
    inner: Mutex<FakeApiClientState>,
}

#[derive(Default)]
struct FakeApiClientState {
    responses: VecDeque<Result<ApiResponse, TransportError>>,
    requests: Vec<ApiRequest>,
}

impl FakeApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: ApiResponse) {
        self.inner.lock().responses.push_back(Ok(response));
    }

    pub fn push_error(&self, error: TransportError) {
        self.inner.lock().responses.push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.inner.lock().requests.clone()
    }
}

#[async_trait]
impl APIClient for FakeApiClient {
    async fn do_request(&self, req: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut inner = self.inner.lock();
        inner.requests.push(req);
        inner
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Fatal("FakeApiClient: no response queued".to_string())))
    }
}

/// Tracks applied/deleted objects keyed by `group/version/kind/namespace/name`
/// and records every call made against it.
#[derive(Debug, Clone)]
pub enum TransportCall {
    Apply { gvk: Gvk, operation: Operation },
    Get { gvk: Gvk, name: String },
    Discover { gvk: Gvk, label_selector: String },
    Delete { gvk: Gvk, name: String },
}

#[derive(Default)]
pub struct FakeTransport {
    inner: Mutex<FakeTransportState>,
}

#[derive(Default)]
struct FakeTransportState {
    objects: Vec<Value>,
    calls: Vec<TransportCall>,
    get_overrides: VecDeque<Result<Option<Value>, TransportError>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object as if a previous apply had put it on the server.
    pub fn seed(&self, object: Value) {
        self.inner.lock().objects.push(object);
    }

    /// Queue a canned answer for the next `get` call, overriding the
    /// default "search `objects` by name" behavior once.
    pub fn push_get_result(&self, result: Result<Option<Value>, TransportError>) {
        self.inner.lock().get_overrides.push_back(result);
    }

    pub fn calls(&self) -> Vec<TransportCall> {
        self.inner.lock().calls.clone()
    }

    pub fn objects(&self) -> Vec<Value> {
        self.inner.lock().objects.clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn apply(&self, manifest: &Value, operation: Operation) -> Result<ApplyOutcome, TransportError> {
        let gvk = Gvk::from_manifest(manifest)
            .ok_or_else(|| TransportError::Fatal("manifest missing apiVersion/kind".to_string()))?;
        let mut inner = self.inner.lock();
        inner.calls.push(TransportCall::Apply { gvk, operation });
        let name = manifest.get_path("metadata.name").and_then(Value::as_str).map(str::to_string);
        if let Some(name) = &name {
            inner.objects.retain(|o| o.get_path("metadata.name").and_then(Value::as_str) != Some(name.as_str()));
        }
        inner.objects.push(manifest.clone());
        Ok(ApplyOutcome { operation, resulting_object: manifest.clone() })
    }

    async fn get(&self, gvk: &Gvk, _namespace: Option<&str>, name: &str) -> Result<Option<Value>, TransportError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TransportCall::Get { gvk: gvk.clone(), name: name.to_string() });
        if let Some(result) = inner.get_overrides.pop_front() {
            return result;
        }
        Ok(inner
            .objects
            .iter()
            .find(|o| o.get_path("metadata.name").and_then(Value::as_str) == Some(name))
            .cloned())
    }

    async fn discover(&self, selector: &Selector) -> Result<Vec<Value>, TransportError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TransportCall::Discover {
            gvk: selector.gvk.clone(),
            label_selector: selector.label_selector.clone(),
        });
        let wanted: Vec<(&str, &str)> = selector
            .label_selector
            .split(',')
            .filter_map(|pair| pair.split_once('='))
            .collect();
        Ok(inner
            .objects
            .iter()
            .filter(|o| {
                let labels = o.get_path("metadata.labels").and_then(Value::as_map);
                wanted.iter().all(|(k, v)| {
                    labels
                        .and_then(|m| m.get(*k))
                        .and_then(Value::as_str)
                        == Some(*v)
                })
            })
            .cloned()
            .collect())
    }

    async fn delete(&self, gvk: &Gvk, _namespace: Option<&str>, name: &str) -> Result<(), TransportError> {
        let mut inner = self.inner.lock();
        inner.calls.push(TransportCall::Delete { gvk: gvk.clone(), name: name.to_string() });
        inner.objects.retain(|o| o.get_path("metadata.name").and_then(Value::as_str) != Some(name));
        Ok(())
    }
}

/// In-memory secret/configmap stores keyed by `namespace/name/key`.
#[derive(Default)]
pub struct FakeSecretStore {
    values: Mutex<std::collections::HashMap<(String, String, String), String>>,
}

impl FakeSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, namespace: &str, name: &str, key: &str, value: impl Into<String>) {
        self.values
            .lock()
            .insert((namespace.to_string(), name.to_string(), key.to_string()), value.into());
    }
}

#[async_trait]
impl SecretStore for FakeSecretStore {
    async fn get(&self, namespace: &str, name: &str, key: &str) -> Result<String, TransportError> {
        self.values
            .lock()
            .get(&(namespace.to_string(), name.to_string(), key.to_string()))
            .cloned()
            .ok_or(TransportError::NotFound)
    }
}

#[derive(Default)]
pub struct FakeConfigMapStore {
    values: Mutex<std::collections::HashMap<(String, String, String), String>>,
}

impl FakeConfigMapStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, namespace: &str, name: &str, key: &str, value: impl Into<String>) {
        self.values
            .lock()
            .insert((namespace.to_string(), name.to_string(), key.to_string()), value.into());
    }
}

#[async_trait]
impl ConfigMapStore for FakeConfigMapStore {
    async fn get(&self, namespace: &str, name: &str, key: &str) -> Result<String, TransportError> {
        self.values
            .lock()
            .get(&(namespace.to_string(), name.to_string(), key.to_string()))
            .cloned()
            .ok_or(TransportError::NotFound)
    }
}

#[cfg(test)]
#[path = "fakes_tests.rs"]
mod tests;
