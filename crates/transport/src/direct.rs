// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Direct Kubernetes transport: applies manifests straight against an API
//! server via a dynamic [`kube::Client`].
//!
//! Grounded on the `quay-clair-operator` controller's `kube` usage
//! (`controller/src/clairs.rs`, `controller/src/lib.rs`): `PatchParams`,
//! server-side apply and `Api<T>` construction. That controller works
//! against compiled-in CRD types; this transport instead resolves the
//! `ApiResource` dynamically from each manifest's `apiVersion`/`kind` via
//! `kube::discovery`, since the engine applies arbitrary recipe-supplied
//! manifests rather than one fixed set of resource kinds.

use async_trait::async_trait;
use kube::api::{Api, DynamicObject, ListParams, Patch, PatchParams};
use kube::discovery::{ApiCapabilities, ApiResource, Discovery, Scope};
use kube::Client;
use serde_json::Value as JsonValue;

use crate::error::TransportError;
use crate::transport::{ApplyOutcome, Gvk, Operation, Selector, Transport};

const FIELD_MANAGER: &str = "reconadapter";

pub struct DirectTransport {
    client: Client,
    discovery: Discovery,
}

impl DirectTransport {
    /// `discovery` is refreshed by the caller (the daemon's background
    /// refresh task); passing a stale snapshot only risks `NotFound` on a
    /// brand-new CRD, not data corruption.
    pub fn new(client: Client, discovery: Discovery) -> Self {
        Self { client, discovery }
    }

    fn resolve(&self, gvk: &Gvk) -> Result<(ApiResource, ApiCapabilities), TransportError> {
        let group = self
            .discovery
            .groups()
            .find(|g| g.name() == gvk.group)
            .ok_or_else(|| TransportError::Fatal(format!("unknown API group '{}'", gvk.group)))?;
        let (resource, caps) = group
            .resources_by_stability()
            .into_iter()
            .find(|(r, _)| r.version == gvk.version && r.kind == gvk.kind)
            .ok_or_else(|| {
                TransportError::Fatal(format!(
                    "API server does not expose {}/{} {}",
                    gvk.group, gvk.version, gvk.kind
                ))
            })?;
        Ok((resource, caps))
    }

    fn api_for(&self, gvk: &Gvk, namespace: Option<&str>) -> Result<Api<DynamicObject>, TransportError> {
        let (resource, caps) = self.resolve(gvk)?;
        Ok(match (caps.scope, namespace) {
            (Scope::Namespaced, Some(ns)) => Api::namespaced_with(self.client.clone(), ns, &resource),
            (Scope::Namespaced, None) => Api::default_namespaced_with(self.client.clone(), &resource),
            (Scope::Cluster, _) => Api::all_with(self.client.clone(), &resource),
        })
    }
}

#[async_trait]
impl Transport for DirectTransport {
    async fn apply(&self, manifest: &reconadapter_core::Value, operation: Operation) -> Result<ApplyOutcome, TransportError> {
        let gvk = Gvk::from_manifest(manifest)
            .ok_or_else(|| TransportError::Fatal("manifest is missing apiVersion/kind".to_string()))?;
        let namespace = manifest
            .get_path("metadata.namespace")
            .and_then(reconadapter_core::Value::as_str);
        let name = manifest
            .get_path("metadata.name")
            .and_then(reconadapter_core::Value::as_str)
            .ok_or_else(|| TransportError::Fatal("manifest is missing metadata.name".to_string()))?
            .to_string();
        let api = self.api_for(&gvk, namespace)?;

        if operation == Operation::Recreate {
            self.delete(&gvk, namespace, &name).await?;
        }

        let json: JsonValue = manifest.clone().into();
        let dynamic: DynamicObject = serde_json::from_value(json)
            .map_err(|e| TransportError::Fatal(format!("invalid manifest: {e}")))?;
        let result = api
            .patch(&name, &PatchParams::apply(FIELD_MANAGER).force(), &Patch::Apply(&dynamic))
            .await
            .map_err(map_kube_error)?;

        Ok(ApplyOutcome {
            operation,
            resulting_object: serde_json::to_value(&result)
                .unwrap_or(JsonValue::Null)
                .into(),
        })
    }

    async fn get(&self, gvk: &Gvk, namespace: Option<&str>, name: &str) -> Result<Option<reconadapter_core::Value>, TransportError> {
        let api = self.api_for(gvk, namespace)?;
        match api.get_opt(name).await.map_err(map_kube_error)? {
            Some(obj) => Ok(Some(serde_json::to_value(&obj).unwrap_or(JsonValue::Null).into())),
            None => Ok(None),
        }
    }

    async fn discover(&self, selector: &Selector) -> Result<Vec<reconadapter_core::Value>, TransportError> {
        let api = self.api_for(&selector.gvk, selector.namespace.as_deref())?;
        let params = ListParams::default().labels(&selector.label_selector);
        let list = api.list(&params).await.map_err(map_kube_error)?;
        Ok(list
            .items
            .into_iter()
            .map(|obj| serde_json::to_value(&obj).unwrap_or(JsonValue::Null).into())
            .collect())
    }

    async fn delete(&self, gvk: &Gvk, namespace: Option<&str>, name: &str) -> Result<(), TransportError> {
        let api = self.api_for(gvk, namespace)?;
        api.delete(name, &Default::default()).await.map_err(map_kube_error)?;
        Ok(())
    }
}

fn map_kube_error(err: kube::Error) -> TransportError {
    match &err {
        kube::Error::Api(resp) if resp.code == 404 => TransportError::NotFound,
        kube::Error::Api(resp) if matches!(resp.code, 408 | 409 | 429) || resp.code >= 500 => {
            TransportError::Retryable(err.to_string())
        }
        _ => TransportError::Fatal(err.to_string()),
    }
}
