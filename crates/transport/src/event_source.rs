// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound change-notification stream (spec §2, §6 "Event shape").

use async_trait::async_trait;
use reconadapter_core::AdapterEvent;

use crate::error::SourceError;

/// Pulls one [`AdapterEvent`] at a time off a message bus and acknowledges
/// or rejects it once the orchestrator has finished with it.
///
/// Non-goal per spec §1: this crate does not implement an actual bus.
/// Implementations live in the daemon binary or behind `test-support`.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn recv(&self) -> Result<Option<AdapterEvent>, SourceError>;
    async fn ack(&self, id: &str);
    async fn nack(&self, id: &str);
}
