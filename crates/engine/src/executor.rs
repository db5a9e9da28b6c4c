// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step executor (spec §4.5): dispatches one step, turning every failure
//! into a soft [`StepResult`] rather than aborting the batch.
//!
//! Grounded on the teacher's `Executor::execute`/`execute_inner` split
//! (`crates/engine/src/executor.rs`): an outer method that owns span +
//! timing + success/failure logging, an inner one that does the real
//! per-kind dispatch and is free to return early with `?`.

use std::rc::Rc;
use std::time::Duration;

use reconadapter_core::{Scope, Value};
use reconadapter_expr::evaluate;
use reconadapter_recipe::{
    ApiCallStep, BackoffKind, HttpMethod as RecipeHttpMethod, LogLevel, LogStep, ParamStep, PayloadStep,
    ResourceStep, Step, StepKind,
};
use reconadapter_recipe::template;
use reconadapter_transport::{
    ApiRequest, Backoff, ConfigMapStore, Gvk, HttpMethod, Operation, RetryPolicy, SecretStore, Transport,
    TransportError, APIClient,
};

use crate::context::{ExecutionContext, StepErrorInfo, StepResult};
use crate::error::{StepError, StepErrorKind};
use crate::params::{self, ParamEnv};
use crate::{discovery, lifecycle, payload};

/// Everything a step needs to reach the outside world. Borrowed for the
/// lifetime of one `run_step` call; the orchestrator owns the concrete
/// instances for the whole event.
pub struct StepExecutor<'a> {
    pub transport: &'a dyn Transport,
    pub api_client: &'a dyn APIClient,
    pub secrets: &'a dyn SecretStore,
    pub configmaps: &'a dyn ConfigMapStore,
    pub default_namespace: Option<&'a str>,
}

impl<'a> StepExecutor<'a> {
    pub async fn run_step(&self, step: &Step, ctx: &mut ExecutionContext) {
        let scope = ctx.scope();
        let kind = step.kind.label();

        match self.evaluate_when(step, &scope) {
            Ok(true) => {}
            Ok(false) => {
                ctx.record_step_result(StepResult::skipped(step.name.clone(), kind, "when"));
                return;
            }
            Err(e) => {
                ctx.record_step_result(StepResult::failed(
                    step.name.clone(),
                    kind,
                    StepErrorInfo::new(&e.kind, e.message),
                ));
                return;
            }
        }

        let span = tracing::info_span!("step", step = %step.name, kind);
        let _guard = span.enter();
        let start = std::time::Instant::now();
        let outcome = self.dispatch(step, &scope, ctx).await;
        let elapsed = start.elapsed();

        match outcome {
            Ok(value) => {
                tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "step completed");
                ctx.record_step_result(StepResult::ok(step.name.clone(), kind, value));
            }
            Err(e) => {
                tracing::warn!(elapsed_ms = elapsed.as_millis() as u64, error = %e, "step failed");
                ctx.record_step_result(StepResult::failed(
                    step.name.clone(),
                    kind,
                    StepErrorInfo::new(&e.kind, e.message),
                ));
            }
        }
    }

    /// Absent guard → run; non-bool or evaluation error → treat as
    /// `false`/`Skipped`, except a type mismatch on a *present* boolean
    /// result, which is a hard `StepError::WhenType` (spec §4.5 step 1).
    fn evaluate_when(&self, step: &Step, scope: &Rc<Scope>) -> Result<bool, StepError> {
        let Some(expr) = &step.when else { return Ok(true) };
        match evaluate(expr, scope) {
            Ok(r) => match r.value {
                Value::Bool(b) => Ok(b),
                _ => Err(StepError::new(StepErrorKind::WhenType, format!("`when` on '{}' did not evaluate to a bool", step.name))),
            },
            Err(_) => Ok(false),
        }
    }

    async fn dispatch(&self, step: &Step, scope: &Rc<Scope>, ctx: &mut ExecutionContext) -> Result<Option<Value>, StepError> {
        match &step.kind {
            StepKind::Param(p) => self.run_param(&step.name, p, scope, ctx).await,
            StepKind::ApiCall(a) => self.run_api_call(&step.name, a, scope, ctx).await,
            StepKind::Resource(r) => self.run_resource(&step.name, r, scope, ctx).await,
            StepKind::Payload(p) => self.run_payload(&step.name, p, scope, ctx),
            StepKind::Log(l) => self.run_log(l, scope),
        }
    }

    async fn run_param(
        &self,
        name: &str,
        step: &ParamStep,
        scope: &Rc<Scope>,
        ctx: &mut ExecutionContext,
    ) -> Result<Option<Value>, StepError> {
        let env = ParamEnv { secrets: self.secrets, configmaps: self.configmaps };
        let value = params::resolve(step, scope, &env).await?;
        ctx.set_variable(name.to_string(), value.clone());
        Ok(Some(value))
    }

    async fn run_api_call(
        &self,
        name: &str,
        step: &ApiCallStep,
        scope: &Rc<Scope>,
        ctx: &mut ExecutionContext,
    ) -> Result<Option<Value>, StepError> {
        let url = template::render(&step.url, scope)?;
        let mut headers = indexmap::IndexMap::with_capacity(step.headers.len());
        for (k, v) in &step.headers {
            headers.insert(k.clone(), template::render(v, scope)?);
        }
        let body = step.body.as_ref().map(|b| payload::realize(b, scope)).transpose()?;
        let retry = RetryPolicy {
            attempts: step.retry_attempts.unwrap_or(1),
            backoff: map_backoff(step.retry_backoff.unwrap_or(BackoffKind::Constant)),
            ..RetryPolicy::default()
        };
        let request = ApiRequest {
            method: map_method(step.method),
            url,
            headers,
            body,
            timeout: step.timeout_seconds.map(Duration::from_secs),
            retry,
        };
        let response = self.api_client.do_request(request).await?.into_status_result()?;

        let capture_root = response.body.clone().unwrap_or(Value::Null);
        let capture_scope = Scope::root(capture_root);
        for capture in &step.capture {
            let resolved = if let Some(expr) = &capture.expression {
                evaluate(expr, &capture_scope).map(|r| r.value)
            } else if let Some(field) = &capture.field {
                Ok(capture_scope.lookup_path(field).cloned().unwrap_or(Value::Null))
            } else {
                Ok(Value::Null)
            };
            match resolved {
                Ok(v) => ctx.set_variable(capture.name.clone(), v),
                Err(e) => tracing::warn!(capture = %capture.name, error = %e, "capture failed, skipping"),
            }
        }

        let response_value = response.body.clone().unwrap_or(Value::Null);
        ctx.set_variable(name.to_string(), response_value.clone());
        Ok(Some(response_value))
    }

    async fn run_resource(
        &self,
        name: &str,
        step: &ResourceStep,
        scope: &Rc<Scope>,
        ctx: &mut ExecutionContext,
    ) -> Result<Option<Value>, StepError> {
        let tree = self.load_manifest(step, scope).await?;
        let desired = payload::realize(&tree, scope)?;
        let gvk = Gvk::from_manifest(&desired)
            .ok_or_else(|| StepError::new(StepErrorKind::Internal, "manifest missing apiVersion/kind"))?;
        let namespace = desired
            .get_path("metadata.namespace")
            .and_then(Value::as_str)
            .or(self.default_namespace);
        let name_in_manifest = desired
            .get_path("metadata.name")
            .and_then(Value::as_str)
            .ok_or_else(|| StepError::new(StepErrorKind::Internal, "manifest missing metadata.name"))?;

        let existing = match self.transport.get(&gvk, namespace, name_in_manifest).await {
            Ok(v) => v,
            Err(TransportError::NotFound) => None,
            Err(e) => return Err(lifecycle::get_error(e)),
        };
        let operation = lifecycle::decide(&desired, existing.as_ref(), step.recreate_on_change);
        if operation == Operation::Skip {
            ctx.set_resources_skipped(format!("{name} already at the desired generation"));
        } else {
            self.transport.apply(&desired, operation).await?;
        }

        let discovered = discovery::discover(self.transport, &gvk, &step.discovery, namespace).await?;
        ctx.set_resource(name.to_string(), discovered.clone());

        for nested in &step.nested_discoveries {
            match discovery::nested_discover(&discovered, &nested.discovery) {
                Some(v) => ctx.set_resource(nested.name.clone(), v),
                None => tracing::debug!(nested = %nested.name, "nested discovery found nothing"),
            }
        }
        Ok(Some(discovered))
    }

    async fn load_manifest(&self, step: &ResourceStep, scope: &Rc<Scope>) -> Result<Value, StepError> {
        match &step.manifest {
            reconadapter_recipe::ManifestSource::Inline(v) => Ok(v.clone()),
            reconadapter_recipe::ManifestSource::Path(p) => {
                let path = template::render(p, scope)?;
                let raw = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| StepError::new(StepErrorKind::Internal, format!("reading manifest '{path}': {e}")))?;
                let json: serde_json::Value = serde_yaml::from_str(&raw)
                    .map_err(|e| StepError::new(StepErrorKind::Internal, format!("parsing manifest '{path}': {e}")))?;
                Ok(Value::from(json))
            }
        }
    }

    fn run_payload(
        &self,
        name: &str,
        step: &PayloadStep,
        scope: &Rc<Scope>,
        ctx: &mut ExecutionContext,
    ) -> Result<Option<Value>, StepError> {
        let value = payload::realize(&step.tree, scope)?;
        let serialized = serde_json::to_string(&value)
            .map_err(|e| StepError::new(StepErrorKind::Internal, format!("serializing payload '{name}': {e}")))?;
        ctx.set_variable(name.to_string(), Value::String(serialized));
        Ok(Some(value))
    }

    fn run_log(&self, step: &LogStep, scope: &Rc<Scope>) -> Result<Option<Value>, StepError> {
        let message = template::render(&step.message, scope)?;
        match step.level {
            LogLevel::Debug => tracing::debug!(%message, "recipe log"),
            LogLevel::Info => tracing::info!(%message, "recipe log"),
            LogLevel::Warn => tracing::warn!(%message, "recipe log"),
            LogLevel::Error => tracing::error!(%message, "recipe log"),
        }
        Ok(None)
    }
}

fn map_method(method: RecipeHttpMethod) -> HttpMethod {
    match method {
        RecipeHttpMethod::Get => HttpMethod::Get,
        RecipeHttpMethod::Post => HttpMethod::Post,
        RecipeHttpMethod::Put => HttpMethod::Put,
        RecipeHttpMethod::Patch => HttpMethod::Patch,
        RecipeHttpMethod::Delete => HttpMethod::Delete,
        RecipeHttpMethod::Head => HttpMethod::Head,
        RecipeHttpMethod::Options => HttpMethod::Options,
    }
}

fn map_backoff(backoff: BackoffKind) -> Backoff {
    match backoff {
        BackoffKind::Exponential => Backoff::Exponential,
        BackoffKind::Linear => Backoff::Linear,
        BackoffKind::Constant => Backoff::Constant,
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
