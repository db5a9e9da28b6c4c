// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource apply/get/discover surface (spec §2 `Transport`, §6 "Resource
//! transport surface").
//!
//! Two implementations exist behind this one capability set: [`crate::direct::DirectTransport`]
//! applies directly against a Kubernetes-shaped API server; [`crate::remote::RemoteDispatchTransport`]
//! wraps manifests into a bus envelope for a remote apply worker. The engine
//! never branches on which one it holds (spec §9 "plugin-style transports").

use async_trait::async_trait;
use reconadapter_core::Value;

use crate::error::TransportError;

/// Group/version/kind plus the coordinates needed to address one object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gvk {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl Gvk {
    pub fn from_manifest(manifest: &Value) -> Option<Self> {
        let api_version = manifest.get_path("apiVersion")?.as_str()?;
        let kind = manifest.get_path("kind")?.as_str()?.to_string();
        let (group, version) = match api_version.split_once('/') {
            Some((g, v)) => (g.to_string(), v.to_string()),
            None => (String::new(), api_version.to_string()),
        };
        Some(Gvk { group, version, kind })
    }
}

/// A label-selector query used by `bySelectors` discovery (spec §4.7).
#[derive(Debug, Clone)]
pub struct Selector {
    pub gvk: Gvk,
    pub label_selector: String,
    pub namespace: Option<String>,
}

/// What [`Transport::apply`] actually did, used to drive the `StepResult`
/// and logs; the lifecycle decision that produced it lives in
/// `reconadapter_engine::lifecycle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
    Skip,
    Recreate,
}

#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub operation: Operation,
    pub resulting_object: Value,
}

/// The abstract apply/get/discover capability set the engine consumes.
/// Implementations must be safe for concurrent use (spec §5 "Parallelism
/// across events").
#[async_trait]
pub trait Transport: Send + Sync {
    async fn apply(&self, manifest: &Value, operation: Operation) -> Result<ApplyOutcome, TransportError>;

    async fn get(&self, gvk: &Gvk, namespace: Option<&str>, name: &str) -> Result<Option<Value>, TransportError>;

    async fn discover(&self, selector: &Selector) -> Result<Vec<Value>, TransportError>;

    async fn delete(&self, gvk: &Gvk, namespace: Option<&str>, name: &str) -> Result<(), TransportError>;
}
