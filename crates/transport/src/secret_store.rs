// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `secret.NS.NAME.KEY` / `configmap.NS.NAME.KEY` parameter sources
//! (spec §6 "Parameter source prefixes").

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{ConfigMap, Secret};
use kube::{Api, Client};

use crate::error::TransportError;

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, namespace: &str, name: &str, key: &str) -> Result<String, TransportError>;
}

#[async_trait]
pub trait ConfigMapStore: Send + Sync {
    async fn get(&self, namespace: &str, name: &str, key: &str) -> Result<String, TransportError>;
}

pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get(&self, namespace: &str, name: &str, key: &str) -> Result<String, TransportError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = api.get(name).await.map_err(map_kube_error)?;
        let bytes = secret
            .data
            .and_then(|mut d| d.remove(key))
            .ok_or_else(|| TransportError::NotFound)?;
        String::from_utf8(bytes.0)
            .map_err(|e| TransportError::Fatal(format!("secret '{namespace}/{name}.{key}' is not UTF-8: {e}")))
    }
}

pub struct KubeConfigMapStore {
    client: Client,
}

impl KubeConfigMapStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigMapStore for KubeConfigMapStore {
    async fn get(&self, namespace: &str, name: &str, key: &str) -> Result<String, TransportError> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        let cm = api.get(name).await.map_err(map_kube_error)?;
        cm.data
            .and_then(|mut d| d.remove(key))
            .ok_or_else(|| TransportError::NotFound)
    }
}

fn map_kube_error(err: kube::Error) -> TransportError {
    match &err {
        kube::Error::Api(resp) if resp.code == 404 => TransportError::NotFound,
        kube::Error::Api(resp) if resp.code >= 500 => TransportError::Retryable(err.to_string()),
        _ => TransportError::Fatal(err.to_string()),
    }
}
