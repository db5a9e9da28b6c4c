// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! External interfaces the core engine consumes: the event source, the
//! upstream control-plane API client, the resource transport, and the
//! secret/configmap stores. Only traits and their direct/remote
//! implementations live here — the bus itself, the REST API, and the
//! Kubernetes API server are non-goals (spec §1) this crate merely talks to.

mod api_client;
pub mod direct;
mod error;
mod event_source;
pub mod remote;
mod reqwest_client;
mod secret_store;
mod transport;

pub use api_client::{retrying, ApiRequest, ApiResponse, Backoff, HttpMethod, RetryPolicy, APIClient};
pub use direct::DirectTransport;
pub use error::{ApiStatusError, SourceError, TransportError};
pub use event_source::EventSource;
pub use remote::{BusPublisher, RemoteDispatchTransport};
pub use reqwest_client::{ClientCert, ReqwestApiClient};
pub use secret_store::{ConfigMapStore, KubeConfigMapStore, KubeSecretStore, SecretStore};
pub use transport::{ApplyOutcome, Gvk, Operation, Selector, Transport};

#[cfg(any(test, feature = "test-support"))]
mod fakes;
#[cfg(any(test, feature = "test-support"))]
pub use fakes::{
    FakeApiClient, FakeConfigMapStore, FakeEventSource, FakeSecretStore, FakeTransport, TransportCall,
};
