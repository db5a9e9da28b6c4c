// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! YAML deserialization targets and normalization into [`crate::model`]
//! types. Raw structs mirror the on-disk document permissively (optional
//! fields everywhere a kind discriminant lives); [`normalize_recipe`]
//! enforces the mutual-exclusivity invariants spec.md §3 describes as a
//! tagged variant.

use indexmap::IndexMap;
use reconadapter_core::Value;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigErrorKind};
use crate::model::{
    AdapterSpec, ApiCallStep, BackoffKind, Capture, ClientConfig, Discovery, HttpMethod, LogLevel,
    LogStep, ManifestSource, Metadata, NestedDiscovery, ParamInput, ParamStep, ParamType,
    PayloadStep, Recipe, ResourceStep, Spec, Step, StepKind,
};
use crate::validate;

/// Load a recipe from a deployment-level YAML document and an optional
/// task-level document. Task-level `spec.steps` append to the
/// deployment-level sequence; task-level `metadata`/`spec.adapter`/
/// `spec.clients` entries override the deployment-level ones on collision.
pub fn load_recipe(deployment: &str, task: Option<&str>) -> Result<Recipe, ConfigError> {
    let deployment_raw: RawRecipe = serde_yaml::from_str(deployment)?;
    let merged = match task {
        None => deployment_raw,
        Some(task_src) => {
            let task_raw: RawRecipe = serde_yaml::from_str(task_src)?;
            merge(deployment_raw, task_raw)
        }
    };
    let recipe = normalize_recipe(merged)?;
    validate::check(&recipe)?;
    tracing::debug!(
        name = %recipe.metadata.name,
        steps = recipe.spec.steps.len(),
        "recipe loaded"
    );
    Ok(recipe)
}

fn merge(mut base: RawRecipe, task: RawRecipe) -> RawRecipe {
    if !task.metadata.name.is_empty() {
        base.metadata.name = task.metadata.name;
    }
    for (k, v) in task.metadata.labels {
        base.metadata.labels.insert(k, v);
    }
    if !task.spec.adapter.version.is_empty() {
        base.spec.adapter.version = task.spec.adapter.version;
    }
    for (k, v) in task.spec.clients {
        base.spec.clients.insert(k, v);
    }
    base.spec.steps.extend(task.spec.steps);
    base
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRecipe {
    #[serde(default)]
    metadata: RawMetadata,
    #[serde(default)]
    spec: RawSpec,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    labels: IndexMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSpec {
    #[serde(default)]
    adapter: RawAdapterSpec,
    #[serde(default)]
    clients: IndexMap<String, RawClientConfig>,
    #[serde(default)]
    steps: Vec<RawStep>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAdapterSpec {
    #[serde(default)]
    version: String,
}

#[derive(Debug, Deserialize)]
struct RawClientConfig {
    #[serde(default)]
    timeout_seconds: Option<u64>,
    #[serde(default)]
    retry_attempts: Option<u32>,
    #[serde(default)]
    retry_backoff: Option<BackoffKind>,
}

#[derive(Debug, Deserialize)]
struct RawStep {
    name: String,
    #[serde(default)]
    when: Option<String>,
    #[serde(default)]
    param: Option<RawParamStep>,
    #[serde(default, rename = "apiCall")]
    api_call: Option<RawApiCallStep>,
    #[serde(default)]
    resource: Option<RawResourceStep>,
    #[serde(default)]
    payload: Option<Value>,
    #[serde(default)]
    log: Option<RawLogStep>,
}

#[derive(Debug, Deserialize)]
struct RawParamStep {
    #[serde(default)]
    value: Option<Value>,
    #[serde(default)]
    expression: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default, rename = "type")]
    ty: Option<ParamType>,
}

#[derive(Debug, Deserialize)]
struct RawApiCallStep {
    method: HttpMethod,
    url: String,
    #[serde(default)]
    timeout_seconds: Option<u64>,
    #[serde(default)]
    retry_attempts: Option<u32>,
    #[serde(default)]
    retry_backoff: Option<BackoffKind>,
    #[serde(default)]
    headers: IndexMap<String, String>,
    #[serde(default)]
    body: Option<Value>,
    #[serde(default)]
    capture: Vec<RawCapture>,
}

#[derive(Debug, Deserialize)]
struct RawCapture {
    name: String,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawResourceStep {
    #[serde(default)]
    manifest: Option<Value>,
    #[serde(default, rename = "manifestPath")]
    manifest_path: Option<String>,
    #[serde(default)]
    discovery: Option<RawDiscovery>,
    #[serde(default, rename = "nestedDiscoveries")]
    nested_discoveries: Vec<RawNestedDiscovery>,
    #[serde(default, rename = "recreateOnChange")]
    recreate_on_change: bool,
}

#[derive(Debug, Deserialize)]
struct RawDiscovery {
    #[serde(default, rename = "byName")]
    by_name: Option<String>,
    #[serde(default, rename = "bySelectors")]
    by_selectors: Option<RawSelectors>,
}

#[derive(Debug, Deserialize)]
struct RawSelectors {
    #[serde(rename = "labelSelector")]
    label_selector: String,
    #[serde(default)]
    namespace: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawNestedDiscovery {
    name: String,
    discovery: RawDiscovery,
}

#[derive(Debug, Deserialize)]
struct RawLogStep {
    #[serde(default)]
    level: Option<LogLevel>,
    message: String,
}

fn normalize_recipe(raw: RawRecipe) -> Result<Recipe, ConfigError> {
    let steps = raw
        .spec
        .steps
        .into_iter()
        .enumerate()
        .map(|(idx, s)| normalize_step(s, idx))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Recipe {
        metadata: Metadata {
            name: raw.metadata.name,
            labels: raw.metadata.labels,
        },
        spec: Spec {
            adapter: AdapterSpec {
                version: raw.spec.adapter.version,
            },
            clients: raw
                .spec
                .clients
                .into_iter()
                .map(|(k, v)| {
                    (
                        k,
                        ClientConfig {
                            timeout_seconds: v.timeout_seconds,
                            retry_attempts: v.retry_attempts,
                            retry_backoff: v.retry_backoff,
                        },
                    )
                })
                .collect(),
            steps,
        },
    })
}

fn normalize_step(raw: RawStep, idx: usize) -> Result<Step, ConfigError> {
    let path = format!("spec.steps[{idx}]");
    let name = raw.name;
    let kind = match (raw.param, raw.api_call, raw.resource, raw.payload, raw.log) {
        (Some(p), None, None, None, None) => StepKind::Param(normalize_param(p)),
        (None, Some(a), None, None, None) => StepKind::ApiCall(normalize_api_call(a, &path)?),
        (None, None, Some(r), None, None) => StepKind::Resource(normalize_resource(r, &path)?),
        (None, None, None, Some(tree), None) => StepKind::Payload(PayloadStep { tree }),
        (None, None, None, None, Some(l)) => StepKind::Log(LogStep {
            level: l.level.unwrap_or_default(),
            message: l.message,
        }),
        _ => {
            return Err(ConfigError::structural(
                path,
                ConfigErrorKind::MutuallyExclusive,
                format!(
                    "step '{name}' must set exactly one of param/apiCall/resource/payload/log"
                ),
            ))
        }
    };
    Ok(Step {
        name,
        when: raw.when,
        kind,
    })
}

fn normalize_param(p: RawParamStep) -> ParamStep {
    let input = match (p.value, p.expression, p.source) {
        (Some(v), _, _) => ParamInput::Value(v),
        (None, Some(e), _) => ParamInput::Expression(e),
        (None, None, Some(s)) => ParamInput::Source(s),
        // No selector set at all binds to a null literal; downstream `when`
        // guards are expected to gate on its absence (spec §9 — soft).
        (None, None, None) => ParamInput::Value(Value::Null),
    };
    ParamStep {
        input,
        default: p.default,
        ty: p.ty,
    }
}

fn normalize_api_call(a: RawApiCallStep, path: &str) -> Result<ApiCallStep, ConfigError> {
    let capture = a
        .capture
        .into_iter()
        .map(|c| normalize_capture(c, path))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ApiCallStep {
        method: a.method,
        url: a.url,
        timeout_seconds: a.timeout_seconds,
        retry_attempts: a.retry_attempts,
        retry_backoff: a.retry_backoff,
        headers: a.headers,
        body: a.body,
        capture,
    })
}

fn normalize_capture(c: RawCapture, path: &str) -> Result<Capture, ConfigError> {
    match (&c.field, &c.expression) {
        (Some(_), Some(_)) => Err(ConfigError::structural(
            path,
            ConfigErrorKind::MutuallyExclusive,
            format!("capture '{}' must set only one of field/expression", c.name),
        )),
        (None, None) => Err(ConfigError::structural(
            path,
            ConfigErrorKind::MissingField,
            format!("capture '{}' must set field or expression", c.name),
        )),
        _ => Ok(Capture {
            name: c.name,
            field: c.field,
            expression: c.expression,
        }),
    }
}

fn normalize_resource(r: RawResourceStep, path: &str) -> Result<ResourceStep, ConfigError> {
    let manifest = match (r.manifest, r.manifest_path) {
        (Some(v), None) => ManifestSource::Inline(v),
        (None, Some(p)) => ManifestSource::Path(p),
        (Some(_), Some(_)) => {
            return Err(ConfigError::structural(
                path,
                ConfigErrorKind::MutuallyExclusive,
                "resource step must set only one of manifest/manifestPath",
            ))
        }
        (None, None) => {
            return Err(ConfigError::structural(
                path,
                ConfigErrorKind::MissingField,
                "resource step must set manifest or manifestPath",
            ))
        }
    };
    let discovery = normalize_discovery(
        r.discovery.ok_or_else(|| {
            ConfigError::structural(path, ConfigErrorKind::MissingField, "resource step must set discovery")
        })?,
        path,
    )?;
    let nested_discoveries = r
        .nested_discoveries
        .into_iter()
        .map(|n| {
            Ok(NestedDiscovery {
                name: n.name,
                discovery: normalize_discovery(n.discovery, path)?,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;
    Ok(ResourceStep {
        manifest,
        discovery,
        nested_discoveries,
        recreate_on_change: r.recreate_on_change,
    })
}

fn normalize_discovery(d: RawDiscovery, path: &str) -> Result<Discovery, ConfigError> {
    match (d.by_name, d.by_selectors) {
        (Some(n), None) => Ok(Discovery::ByName(n)),
        (None, Some(s)) => Ok(Discovery::BySelectors {
            label_selector: s.label_selector,
            namespace: s.namespace,
        }),
        (Some(_), Some(_)) => Err(ConfigError::structural(
            path,
            ConfigErrorKind::MutuallyExclusive,
            "discovery must set only one of byName/bySelectors",
        )),
        (None, None) => Err(ConfigError::structural(
            path,
            ConfigErrorKind::MissingField,
            "discovery must set byName or bySelectors",
        )),
    }
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
