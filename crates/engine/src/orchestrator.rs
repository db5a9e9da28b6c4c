// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level per-event driver (spec §4.9, §5 concurrency model).
//!
//! One `handle_event` call owns one `ExecutionContext` for the lifetime of
//! one event; steps run strictly sequentially. [`RuntimeError`] is the only
//! error this returns — every step-local failure is absorbed into the
//! result's `errors`/`step_results`, matching the teacher's outer
//! `RuntimeError`/inner `ExecuteError` split in spirit (see `error.rs`).

use reconadapter_core::EventData;
use reconadapter_recipe::Recipe;
use reconadapter_transport::{ConfigMapStore, SecretStore, Transport, APIClient};
use tokio_util::sync::CancellationToken;

use crate::context::{ExecutionContext, ExecutionResult, StepErrorInfo, StepResult};
use crate::error::{RuntimeError, StepErrorKind};
use crate::executor::StepExecutor;

pub struct Orchestrator<'a> {
    pub transport: &'a dyn Transport,
    pub api_client: &'a dyn APIClient,
    pub secrets: &'a dyn SecretStore,
    pub configmaps: &'a dyn ConfigMapStore,
    pub default_namespace: Option<&'a str>,
}

impl<'a> Orchestrator<'a> {
    /// Run every step of `recipe` against one inbound event. `deadline`
    /// races each step's own execution rather than being checked once up
    /// front, so the step in flight when it fires is the one marked
    /// cancelled — every later step still gets its own turn through the
    /// loop and its own entry in `step_results`, preserving the
    /// always-report pattern (spec §5 "Cancellation").
    pub async fn handle_event(
        &self,
        recipe: &Recipe,
        event_data: EventData,
        deadline: CancellationToken,
    ) -> Result<ExecutionResult, RuntimeError> {
        let mut ctx = ExecutionContext::new(&recipe.metadata, event_data);
        let executor = StepExecutor {
            transport: self.transport,
            api_client: self.api_client,
            secrets: self.secrets,
            configmaps: self.configmaps,
            default_namespace: self.default_namespace,
        };

        for step in &recipe.spec.steps {
            tokio::select! {
                biased;
                _ = deadline.cancelled() => {
                    ctx.record_step_result(StepResult::failed(
                        step.name.clone(),
                        step.kind.label(),
                        StepErrorInfo::new(&StepErrorKind::Cancelled, "execution deadline exceeded"),
                    ));
                }
                () = executor.run_step(step, &mut ctx) => {}
            }
        }

        Ok(ctx.finish())
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
