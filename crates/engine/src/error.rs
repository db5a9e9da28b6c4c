// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the step executor and orchestrator (spec §7).
//!
//! Grounded on the teacher's `RuntimeError`/`ExecuteError` split
//! (`crates/engine/src/error.rs`, `crates/engine/src/executor.rs`): an
//! inner, per-operation error type (here `StepError`) and an outer type
//! that is the only thing allowed to escape the top-level entry point.
//! Every step error is *soft* here — it becomes a `StepResult`, never a
//! `RuntimeError` — so `RuntimeError` ends up far smaller than the
//! teacher's, matching spec §7 "Only InternalError escapes the orchestrator."

use reconadapter_expr::ExprErrorKind;
use thiserror::Error;

/// The kind tag recorded on a failed `StepResult` / `adapter.executionError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepErrorKind {
    /// `when` guard evaluated to a non-boolean value.
    WhenType,
    Render,
    Expression(ExprErrorKind),
    Capture,
    Transport,
    ApiStatus(u16),
    Cancelled,
    Internal,
}

impl std::fmt::Display for StepErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepErrorKind::WhenType => write!(f, "when_type"),
            StepErrorKind::Render => write!(f, "render"),
            StepErrorKind::Expression(k) => write!(f, "expr:{k}"),
            StepErrorKind::Capture => write!(f, "capture"),
            StepErrorKind::Transport => write!(f, "transport"),
            StepErrorKind::ApiStatus(code) => write!(f, "api_status:{code}"),
            StepErrorKind::Cancelled => write!(f, "cancelled"),
            StepErrorKind::Internal => write!(f, "internal"),
        }
    }
}

/// A step-local failure. Never propagates past [`crate::executor::run_step`] —
/// the soft-failure model (spec §4.5, §7) turns every one of these into a
/// `StepResult` entry instead of aborting the batch.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct StepError {
    pub kind: StepErrorKind,
    pub message: String,
}

impl StepError {
    pub fn new(kind: StepErrorKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}

impl From<reconadapter_recipe::RenderError> for StepError {
    fn from(err: reconadapter_recipe::RenderError) -> Self {
        StepError::new(StepErrorKind::Render, err.to_string())
    }
}

impl From<reconadapter_expr::ExprError> for StepError {
    fn from(err: reconadapter_expr::ExprError) -> Self {
        StepError::new(StepErrorKind::Expression(err.kind), err.detail)
    }
}

impl From<reconadapter_transport::TransportError> for StepError {
    fn from(err: reconadapter_transport::TransportError) -> Self {
        StepError::new(StepErrorKind::Transport, err.to_string())
    }
}

impl From<reconadapter_transport::ApiStatusError> for StepError {
    fn from(err: reconadapter_transport::ApiStatusError) -> Self {
        StepError::new(StepErrorKind::ApiStatus(err.status), err.to_string())
    }
}

impl From<crate::payload::PayloadError> for StepError {
    fn from(err: crate::payload::PayloadError) -> Self {
        match err {
            crate::payload::PayloadError::Render(e) => StepError::new(StepErrorKind::Render, e.to_string()),
            crate::payload::PayloadError::Expression(e) => {
                StepError::new(StepErrorKind::Expression(e.kind), e.detail)
            }
        }
    }
}

/// The only error variant allowed to escape [`crate::orchestrator::Orchestrator::handle_event`]
/// (spec §7, §9 "Only InternalError escapes").
#[derive(Debug, Error)]
#[error("internal engine error: {0}")]
pub struct RuntimeError(pub String);
