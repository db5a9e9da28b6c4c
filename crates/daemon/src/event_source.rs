// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Line-delimited-JSON [`EventSource`] implementation: reads one
//! [`AdapterEvent`] per line from a file (or stdin, with path `"-"`).
//!
//! `reconadapter_transport::EventSource`'s own doc comment calls out that
//! the crate does not implement an actual bus — this is the "daemon
//! binary" half of that split (spec §1 non-goal: "an actual bus"). It
//! assumes whatever upstream system produced the file already durably
//! queued the events; ack/nack are therefore no-ops beyond bookkeeping
//! for observability, not redelivery.

use std::path::PathBuf;

use async_trait::async_trait;
use reconadapter_core::AdapterEvent;
use reconadapter_transport::{EventSource, SourceError};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Mutex;

enum Source {
    Stdin(Mutex<tokio::io::Lines<BufReader<tokio::io::Stdin>>>),
    File(Mutex<tokio::io::Lines<BufReader<tokio::fs::File>>>),
}

pub struct NdjsonEventSource {
    source: Source,
}

impl NdjsonEventSource {
    pub async fn open(path: &str) -> Result<Self, SourceError> {
        if path == "-" {
            let lines = BufReader::new(tokio::io::stdin()).lines();
            return Ok(Self { source: Source::Stdin(Mutex::new(lines)) });
        }
        let file = tokio::fs::File::open(PathBuf::from(path))
            .await
            .map_err(|e| SourceError::Unavailable(format!("opening '{path}': {e}")))?;
        let lines = BufReader::new(file).lines();
        Ok(Self { source: Source::File(Mutex::new(lines)) })
    }
}

#[async_trait]
impl EventSource for NdjsonEventSource {
    async fn recv(&self) -> Result<Option<AdapterEvent>, SourceError> {
        let line = match &self.source {
            Source::Stdin(lines) => lines.lock().await.next_line().await,
            Source::File(lines) => lines.lock().await.next_line().await,
        }
        .map_err(|e| SourceError::Unavailable(e.to_string()))?;

        let Some(line) = line else { return Ok(None) };
        if line.trim().is_empty() {
            return self.recv().await;
        }
        let event: AdapterEvent =
            serde_json::from_str(&line).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(Some(event))
    }

    async fn ack(&self, id: &str) {
        tracing::debug!(event_id = id, "event acknowledged");
    }

    async fn nack(&self, id: &str) {
        tracing::warn!(event_id = id, "event rejected");
    }
}
