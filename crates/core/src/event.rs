// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The inbound change-notification envelope (spec §6 "Event shape").
//!
//! Only `data` is presented to the engine as `eventData`; the envelope
//! fields (`specversion`, `id`, `type`, `source`) are bus plumbing the core
//! never reads from.

use crate::value::Value;
use serde::{Deserialize, Serialize};

/// One change notification pulled from the bus by an `EventSource`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterEvent {
    pub specversion: String,
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub source: String,
    pub data: EventData,
}

/// The `data` payload of an [`AdapterEvent`] — frozen once constructed
/// (spec §3 ownership invariant: "`eventData` is deep-immutable after
/// construction").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventData(Value);

impl EventData {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Resolve a dotted path (`a.b.c`) into this event's data, used by
    /// `event.a.b.c` / bare `a.b.c` parameter sources.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        self.0.get_path(path)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn id(&self) -> Option<&str> {
        self.get_path("id").and_then(Value::as_str)
    }

    pub fn kind(&self) -> Option<&str> {
        self.get_path("kind").and_then(Value::as_str)
    }

    pub fn href(&self) -> Option<&str> {
        self.get_path("href").and_then(Value::as_str)
    }

    pub fn generation(&self) -> Option<i64> {
        match self.get_path("generation") {
            Some(Value::Int(i)) => Some(*i),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
