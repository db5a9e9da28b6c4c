// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The normalized recipe data model — what [`crate::load::load_recipe`]
//! produces, not what YAML looks like on disk. Raw, permissive
//! deserialization targets live in [`crate::load`]; by the time a value of
//! these types exists it has already passed [`crate::validate::check`].

use indexmap::IndexMap;
use reconadapter_core::Value;
use serde::{Deserialize, Serialize};

/// Annotation key every desired manifest must carry, with a decimal integer
/// >= 1, for the resource lifecycle to make a create/update/skip/recreate
/// decision (spec §6 "Manifest annotation").
pub const GENERATION_ANNOTATION_KEY: &str = "reconadapter.io/generation";

#[derive(Debug, Clone, Default, Serialize)]
pub struct Recipe {
    pub metadata: Metadata,
    pub spec: Spec,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub labels: IndexMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Spec {
    pub adapter: AdapterSpec,
    pub clients: IndexMap<String, ClientConfig>,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdapterSpec {
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    Exponential,
    Linear,
    Constant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientConfig {
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_backoff: Option<BackoffKind>,
}

/// One step of a recipe. Exactly one of the five kinds is ever present —
/// [`crate::validate::check`] is the only place that enforces that, and by
/// construction a `Step` you hold has already satisfied it.
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub name: String,
    pub when: Option<String>,
    pub kind: StepKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind")]
pub enum StepKind {
    Param(ParamStep),
    ApiCall(ApiCallStep),
    Resource(ResourceStep),
    Payload(PayloadStep),
    Log(LogStep),
}

impl StepKind {
    /// Short label used in `StepResult.kind` and log fields — mirrors the
    /// teacher's `step.kind` span field.
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Param(_) => "param",
            StepKind::ApiCall(_) => "apiCall",
            StepKind::Resource(_) => "resource",
            StepKind::Payload(_) => "payload",
            StepKind::Log(_) => "log",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamStep {
    pub input: ParamInput,
    pub default: Option<Value>,
    pub ty: Option<ParamType>,
}

/// The mutually-exclusive `value`/`expression`/`source` selector on a
/// `param` step (spec §3 "Step").
#[derive(Debug, Clone, Serialize)]
pub enum ParamInput {
    Value(Value),
    Expression(String),
    /// One of `env.NAME`, `event.a.b.c`, `secret.NS.NAME.KEY`,
    /// `configmap.NS.NAME.KEY`, or a bare dotted path (treated as
    /// `event.<path>`).
    Source(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Int,
    Int64,
    Float,
    Float64,
    Bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiCallStep {
    pub method: HttpMethod,
    pub url: String,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_backoff: Option<BackoffKind>,
    pub headers: IndexMap<String, String>,
    pub body: Option<Value>,
    pub capture: Vec<Capture>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Capture {
    pub name: String,
    pub field: Option<String>,
    pub expression: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceStep {
    pub manifest: ManifestSource,
    pub discovery: Discovery,
    pub nested_discoveries: Vec<NestedDiscovery>,
    pub recreate_on_change: bool,
}

#[derive(Debug, Clone, Serialize)]
pub enum ManifestSource {
    Inline(Value),
    Path(String),
}

#[derive(Debug, Clone, Serialize)]
pub enum Discovery {
    ByName(String),
    BySelectors {
        label_selector: String,
        namespace: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct NestedDiscovery {
    pub name: String,
    pub discovery: Discovery,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayloadStep {
    pub tree: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogStep {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}
