// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Production [`APIClient`] backed by `reqwest` (spec §6 "APIClient
//! surface", §3 ambient "Certificates"). `DirectTransport` talks to the
//! Kubernetes API via `kube`; this is the sibling client for the
//! recipe's own `apiCall` steps, which hit an arbitrary upstream URL.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reconadapter_core::Value;
use reqwest::{Client, Identity};

use crate::api_client::{retrying, ApiRequest, ApiResponse, HttpMethod, APIClient};
use crate::error::TransportError;

/// Client certificate material for mTLS to the upstream control plane.
/// Loaded once at daemon startup from PEM paths in `Config`.
pub struct ClientCert {
    pub cert_pem: Vec<u8>,
    pub key_pem: Vec<u8>,
}

pub struct ReqwestApiClient {
    client: Client,
}

impl ReqwestApiClient {
    pub fn new() -> Result<Self, TransportError> {
        Self::build(None)
    }

    pub fn with_client_cert(cert: ClientCert) -> Result<Self, TransportError> {
        Self::build(Some(cert))
    }

    fn build(cert: Option<ClientCert>) -> Result<Self, TransportError> {
        let mut builder = Client::builder().use_rustls_tls();
        if let Some(cert) = cert {
            let mut pem = cert.cert_pem;
            pem.extend_from_slice(&cert.key_pem);
            let identity = Identity::from_pem(&pem)
                .map_err(|e| TransportError::Fatal(format!("invalid client certificate: {e}")))?;
            builder = builder.identity(identity);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Fatal(format!("building http client: {e}")))?;
        Ok(Self { client })
    }
}

impl Default for ReqwestApiClient {
    fn default() -> Self {
        Self::new().expect("default rustls client configuration is always valid")
    }
}

#[async_trait]
impl APIClient for ReqwestApiClient {
    async fn do_request(&self, req: ApiRequest) -> Result<ApiResponse, TransportError> {
        let policy = req.retry.clone();
        retrying(
            &policy,
            |e| matches!(e, TransportError::Retryable(_)),
            |_attempt| {
                let req = &req;
                async move { send_once(&self.client, req).await }
            },
        )
        .await
    }
}

async fn send_once(client: &Client, req: &ApiRequest) -> Result<ApiResponse, TransportError> {
    let method = match req.method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Options => reqwest::Method::OPTIONS,
    };

    let mut builder = client.request(method, &req.url);
    for (name, value) in &req.headers {
        builder = builder.header(name, value);
    }
    if let Some(timeout) = req.timeout {
        builder = builder.timeout(timeout);
    } else {
        builder = builder.timeout(Duration::from_secs(30));
    }
    if let Some(body) = &req.body {
        builder = builder.json(body);
    }

    let response = builder.send().await.map_err(classify_send_error)?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
        .collect::<IndexMap<_, _>>();

    let bytes = response.bytes().await.map_err(classify_send_error)?;
    let body = if bytes.is_empty() {
        None
    } else {
        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(json) => Some(Value::from(json)),
            Err(_) => Some(Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        }
    };

    Ok(ApiResponse { status, headers, body })
}

fn classify_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() || err.is_connect() {
        TransportError::Retryable(err.to_string())
    } else {
        TransportError::Fatal(err.to_string())
    }
}
