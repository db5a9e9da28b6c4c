// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `/healthz` + `/metrics` HTTP server (spec §3 ambient "Metrics/health").
//!
//! Grounded on the `agent-backplane` pack repo's `abp-daemon` (`axum::serve`
//! over a plain `TcpListener`, shared `Arc<AppState>` state).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::histogram::Histogram;
use prometheus_client::registry::Registry;

#[derive(Clone, Debug, Hash, PartialEq, Eq, prometheus_client::encoding::EncodeLabelSet)]
pub struct ResultLabels {
    pub status: String,
}

/// Shared metric handles, built once at startup and cloned into the
/// orchestrator loop's task spawn closures.
pub struct Metrics {
    pub events_processed: Family<ResultLabels, Counter>,
    pub step_duration_seconds: Histogram,
    registry: Registry,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        let mut registry = Registry::default();
        let events_processed = Family::<ResultLabels, Counter>::default();
        registry.register(
            "reconadapter_events_processed",
            "Events processed, labeled by execution result status",
            events_processed.clone(),
        );
        let step_duration_seconds = Histogram::new(
            [0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0].into_iter(),
        );
        registry.register(
            "reconadapter_step_duration_seconds",
            "Step execution latency",
            step_duration_seconds.clone(),
        );
        Arc::new(Self { events_processed, step_duration_seconds, registry })
    }
}

#[derive(Clone)]
struct AppState {
    metrics: Arc<Metrics>,
    started: Arc<AtomicU64>,
}

pub fn router(metrics: Arc<Metrics>) -> Router {
    let state = AppState { metrics, started: Arc::new(AtomicU64::new(1)) };
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    if state.started.load(Ordering::Relaxed) == 1 {
        (axum::http::StatusCode::OK, "ok")
    } else {
        (axum::http::StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut buf = String::new();
    match encode(&mut buf, &state.metrics.registry) {
        Ok(()) => (
            axum::http::StatusCode::OK,
            [("content-type", "application/openmetrics-text; version=1.0.0; charset=utf-8")],
            buf,
        ),
        Err(e) => (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain")],
            format!("encoding metrics: {e}"),
        ),
    }
}

#[cfg(test)]
#[path = "health_tests.rs"]
mod tests;
