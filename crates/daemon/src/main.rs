// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reconadapterd: the event loop that owns one [`reconadapter_engine::Orchestrator`]
//! per deployment, reading events from an [`reconadapter_transport::EventSource`]
//! and spawning one task per event (spec §5, §8).
//!
//! Grounded on `oj-daemon/src/main.rs`'s top-level `tokio::select!` loop
//! (signal handlers racing the event source) and its per-connection
//! task-spawning style in `oj-daemon/src/listener/mod.rs`.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

use std::sync::Arc;

use reconadapter_engine::Orchestrator;
use reconadapter_recipe::load_recipe;
use reconadapter_transport::{
    ClientCert, ConfigMapStore, DirectTransport, EventSource, KubeConfigMapStore, KubeSecretStore,
    ReqwestApiClient, SecretStore, Transport, APIClient,
};
use reconadapterd::event_source::NdjsonEventSource;
use reconadapterd::{health, logging, Config};
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = Config::load()?;
    info!(bind = %config.bind, "starting reconadapterd");

    let deployment_doc = tokio::fs::read_to_string(&config.deployment_recipe_path).await?;
    let task_doc = match &config.task_recipe_path {
        Some(path) => Some(tokio::fs::read_to_string(path).await?),
        None => None,
    };
    let recipe: &'static _ = Box::leak(Box::new(load_recipe(&deployment_doc, task_doc.as_deref())?));
    info!(recipe = %recipe.metadata.name, steps = recipe.spec.steps.len(), "recipe loaded");

    let kube_client = kube::Client::try_default().await?;
    let discovery = kube::discovery::Discovery::new(kube_client.clone()).run().await?;

    // Leaked once at startup: these outlive every event the process will
    // ever handle, so a `&'static dyn Trait` reference is cheaper than
    // threading `Arc<dyn Trait>` through `Orchestrator`'s lifetime-generic
    // fields for a value that never actually needs to be freed or cloned.
    let transport: &'static dyn Transport = Box::leak(Box::new(DirectTransport::new(kube_client.clone(), discovery)));
    let secrets: &'static dyn SecretStore = Box::leak(Box::new(KubeSecretStore::new(kube_client.clone())));
    let configmaps: &'static dyn ConfigMapStore = Box::leak(Box::new(KubeConfigMapStore::new(kube_client.clone())));
    let api_client: &'static dyn APIClient = Box::leak(Box::new(match (&config.client_cert_path, &config.client_key_path) {
        (Some(cert_path), Some(key_path)) => {
            let cert_pem = tokio::fs::read(cert_path).await?;
            let key_pem = tokio::fs::read(key_path).await?;
            ReqwestApiClient::with_client_cert(ClientCert { cert_pem, key_pem })?
        }
        _ => ReqwestApiClient::new()?,
    }));

    let metrics = health::Metrics::new();
    let health_app = health::router(Arc::clone(&metrics));
    let health_listener = tokio::net::TcpListener::bind(config.bind.as_str()).await?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(health_listener, health_app).await {
            error!(error = %e, "health server stopped");
        }
    });

    let events = Arc::new(NdjsonEventSource::open(&config.event_source_path).await?);

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let default_namespace: Option<&'static str> =
        config.default_namespace.clone().map(|s| &*Box::leak(s.into_boxed_str()));
    let event_deadline = config.event_deadline;

    info!("reconadapterd ready");

    loop {
        tokio::select! {
            result = events.recv() => {
                match result {
                    Ok(Some(event)) => {
                        let metrics = Arc::clone(&metrics);
                        let events = Arc::clone(&events);
                        let span = tracing::info_span!("event", id = %event.id, kind = %event.event_type);
                        tokio::spawn(
                            async move {
                                let orchestrator = Orchestrator {
                                    transport,
                                    api_client,
                                    secrets,
                                    configmaps,
                                    default_namespace,
                                };
                                let deadline = CancellationToken::new();
                                let deadline_clone = deadline.clone();
                                tokio::spawn(async move {
                                    tokio::time::sleep(event_deadline).await;
                                    deadline_clone.cancel();
                                });
                                match orchestrator.handle_event(recipe, event.data, deadline).await {
                                    Ok(result) => {
                                        metrics
                                            .events_processed
                                            .get_or_create(&health::ResultLabels { status: format!("{:?}", result.status) })
                                            .inc();
                                        info!(status = ?result.status, "event processed");
                                        events.ack(&event.id).await;
                                    }
                                    Err(e) => {
                                        error!(error = %e, "event processing failed");
                                        events.nack(&event.id).await;
                                    }
                                }
                            }
                            .instrument(span),
                        );
                    }
                    Ok(None) => {
                        info!("event source closed, shutting down");
                        break;
                    }
                    Err(e) => error!(error = %e, "error reading event source"),
                }
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    Ok(())
}
