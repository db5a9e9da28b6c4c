// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed per-event workspace (spec §3 "ExecutionContext", §4.4).
//!
//! Single-writer, owned by the one task processing an event — no
//! `Arc<RwLock<_>>` anywhere, matching the teacher's "state owned by the
//! event loop, Executor only borrows it" split between `RuntimeDeps` and
//! `Executor` in `oj-engine/src/runtime`. Readers that need a consistent
//! snapshot just clone the (already cheap, `IndexMap`-backed) variable map.

use std::rc::Rc;

use indexmap::IndexMap;
use reconadapter_core::{EventData, Scope, Value};
use reconadapter_recipe::Metadata;
use serde::Serialize;

use crate::error::StepErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failed,
}

impl Default for ExecutionStatus {
    fn default() -> Self {
        ExecutionStatus::Success
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionError {
    pub phase: String,
    pub step: String,
    pub message: String,
}

/// The `adapter` pseudo-root exposed to expressions (spec §4.4, §6
/// "adapter.executionStatus" etc.) — field names below are Rust-idiomatic,
/// but [`AdapterStatus::to_value`] renders them with the camelCase keys
/// recipes actually read.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdapterStatus {
    pub execution_status: ExecutionStatus,
    pub resources_skipped: bool,
    pub skip_reason: Option<String>,
    pub execution_error: Option<ExecutionError>,
}

impl AdapterStatus {
    pub fn to_value(&self) -> Value {
        let execution_error = match &self.execution_error {
            Some(e) => Value::map_from([
                ("phase".to_string(), Value::string(e.phase.clone())),
                ("step".to_string(), Value::string(e.step.clone())),
                ("message".to_string(), Value::string(e.message.clone())),
            ]),
            None => Value::Null,
        };
        let execution_status = match self.execution_status {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failed => "failed",
        };
        Value::map_from([
            ("executionStatus".to_string(), Value::string(execution_status)),
            ("resourcesSkipped".to_string(), Value::Bool(self.resources_skipped)),
            (
                "skipReason".to_string(),
                self.skip_reason.clone().map(Value::string).unwrap_or(Value::Null),
            ),
            ("executionError".to_string(), execution_error),
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepErrorInfo {
    pub kind: String,
    pub message: String,
}

impl StepErrorInfo {
    pub fn new(kind: &StepErrorKind, message: impl Into<String>) -> Self {
        Self { kind: kind.to_string(), message: message.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub name: String,
    pub kind: &'static str,
    pub skipped: bool,
    pub skip_reason: Option<String>,
    pub error: Option<StepErrorInfo>,
    pub value: Option<Value>,
}

impl StepResult {
    pub fn ok(name: impl Into<String>, kind: &'static str, value: Option<Value>) -> Self {
        Self { name: name.into(), kind, skipped: false, skip_reason: None, error: None, value }
    }

    pub fn skipped(name: impl Into<String>, kind: &'static str, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            skipped: true,
            skip_reason: Some(reason.into()),
            error: None,
            value: None,
        }
    }

    pub fn failed(name: impl Into<String>, kind: &'static str, error: StepErrorInfo) -> Self {
        Self { name: name.into(), kind, skipped: false, skip_reason: None, error: Some(error), value: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Success,
    Failed,
}

/// What [`crate::orchestrator::Orchestrator::handle_event`] returns (spec
/// §4.9 step 4).
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub status: ResultStatus,
    pub step_results: Vec<StepResult>,
    pub variables: IndexMap<String, Value>,
    pub resources: IndexMap<String, Value>,
    pub errors: Vec<StepErrorInfo>,
}

pub struct ExecutionContext {
    event_data: EventData,
    variables: IndexMap<String, Value>,
    resources: IndexMap<String, Value>,
    adapter: AdapterStatus,
    step_results: Vec<StepResult>,
}

impl ExecutionContext {
    /// Seeds baseline variables per spec §4.9 step 1: `metadata.name`,
    /// `metadata.labels`, and a default `adapter` struct. Also flattens
    /// `eventData`'s top-level fields directly into the scope so a bare
    /// expression like `generation` resolves the same way a param step's
    /// bare dotted source does (spec §6's "bare path == event.path" rule,
    /// applied uniformly rather than only inside `param.source` — this is
    /// the reading that makes the S1 scenario's `expression: "generation"`
    /// payload descriptor resolvable without an explicit param step).
    pub fn new(metadata: &Metadata, event_data: EventData) -> Self {
        let mut variables = IndexMap::new();
        if let Some(map) = event_data.as_value().as_map() {
            for (k, v) in map {
                variables.insert(k.clone(), v.clone());
            }
        }
        variables.insert("event".to_string(), event_data.as_value().clone());
        variables.insert(
            "metadata".to_string(),
            Value::map_from([
                ("name".to_string(), Value::string(metadata.name.clone())),
                (
                    "labels".to_string(),
                    Value::map_from(metadata.labels.iter().map(|(k, v)| (k.clone(), Value::string(v.clone())))),
                ),
            ]),
        );
        Self {
            event_data,
            variables,
            resources: IndexMap::new(),
            adapter: AdapterStatus::default(),
            step_results: Vec::new(),
        }
    }

    pub fn event_data(&self) -> &EventData {
        &self.event_data
    }

    /// Overwrite-on-collision, logged (spec §4.4 `setVariable`).
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if self.variables.contains_key(&name) {
            tracing::debug!(variable = %name, "variable overwritten");
        }
        self.variables.insert(name, value);
    }

    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Set after successful apply+discovery; nested discoveries set
    /// sibling names by calling this once per promoted name (spec §4.4
    /// `setResource`).
    pub fn set_resource(&mut self, name: impl Into<String>, observed: Value) {
        let name = name.into();
        tracing::debug!(resource = %name, "resource bound");
        self.resources.insert(name, observed);
    }

    pub fn get_resource(&self, name: &str) -> Option<&Value> {
        self.resources.get(name)
    }

    pub fn adapter(&self) -> &AdapterStatus {
        &self.adapter
    }

    pub fn set_resources_skipped(&mut self, reason: impl Into<String>) {
        self.adapter.resources_skipped = true;
        self.adapter.skip_reason = Some(reason.into());
    }

    /// Record one step's outcome. Only the *first* failing step sets
    /// `adapter.executionStatus = failed` / `adapter.executionError` (spec
    /// §4.5 step 2, §7 "first error sticky", §8 invariant 2).
    pub fn record_step_result(&mut self, result: StepResult) {
        if let Some(error) = &result.error {
            if self.adapter.execution_status == ExecutionStatus::Success {
                self.adapter.execution_status = ExecutionStatus::Failed;
                self.adapter.execution_error = Some(ExecutionError {
                    phase: result.name.clone(),
                    step: result.kind.to_string(),
                    message: error.message.clone(),
                });
            }
        }
        self.step_results.push(result);
    }

    /// Build a fresh evaluation root from the context's current state.
    /// Cheap clones only — template/expression/payload evaluation never
    /// suspends (spec §5), so there is no window where a stale scope could
    /// be observed mid-mutation.
    pub fn scope(&self) -> Rc<Scope> {
        let mut root = self.variables.clone();
        root.insert("adapter".to_string(), self.adapter.to_value());
        root.insert("resources".to_string(), Value::Map(self.resources.clone()));
        Scope::root(Value::Map(root))
    }

    pub fn finish(self) -> ExecutionResult {
        let status = match self.adapter.execution_status {
            ExecutionStatus::Success => ResultStatus::Success,
            ExecutionStatus::Failed => ResultStatus::Failed,
        };
        let errors = self.step_results.iter().filter_map(|r| r.error.clone()).collect();
        ExecutionResult {
            status,
            step_results: self.step_results,
            variables: self.variables,
            resources: self.resources,
            errors,
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
