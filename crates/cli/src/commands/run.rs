// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reconctl run` — execute a recipe against one event without a cluster,
//! using the same fakes the engine's own test suite exercises. Useful for
//! authoring a recipe locally before wiring it into `reconadapterd`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use reconadapter_core::{EventData, Value};
use reconadapter_engine::Orchestrator;
use reconadapter_recipe::load_recipe;
use reconadapter_transport::{FakeApiClient, FakeConfigMapStore, FakeSecretStore, FakeTransport};
use tokio_util::sync::CancellationToken;

use crate::output::{print_result, OutputFormat};

#[derive(Args)]
pub struct RunArgs {
    /// Deployment-level recipe document
    pub deployment: PathBuf,
    /// Optional task-level recipe document, merged over the deployment one
    #[arg(long)]
    pub task: Option<PathBuf>,
    /// JSON-encoded event document, or `-` for stdin
    #[arg(long, default_value = "-")]
    pub event: String,
    /// Per-event cancellation deadline in milliseconds
    #[arg(long, default_value_t = 30_000)]
    pub deadline_ms: u64,
}

pub async fn run(args: RunArgs, format: OutputFormat) -> Result<()> {
    let deployment = std::fs::read_to_string(&args.deployment)
        .with_context(|| format!("reading '{}'", args.deployment.display()))?;
    let task = args
        .task
        .as_ref()
        .map(std::fs::read_to_string)
        .transpose()
        .with_context(|| "reading task recipe")?;
    let recipe = load_recipe(&deployment, task.as_deref())?;

    let event_raw = if args.event == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.event).with_context(|| format!("reading '{}'", args.event))?
    };
    let event_json: serde_json::Value = serde_json::from_str(&event_raw).context("parsing event as JSON")?;
    let event_data = EventData::new(Value::from(event_json));

    let transport = FakeTransport::new();
    let api_client = FakeApiClient::new();
    let secrets = FakeSecretStore::new();
    let configmaps = FakeConfigMapStore::new();
    let orchestrator = Orchestrator {
        transport: &transport,
        api_client: &api_client,
        secrets: &secrets,
        configmaps: &configmaps,
        default_namespace: None,
    };

    let deadline = CancellationToken::new();
    let deadline_clone = deadline.clone();
    let deadline_ms = args.deadline_ms;
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(deadline_ms)).await;
        deadline_clone.cancel();
    });

    let result = orchestrator.handle_event(&recipe, event_data, deadline).await?;
    print_result(&result, format)
}
