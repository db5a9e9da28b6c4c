// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Recipe model, loader and template renderer (spec.md C1/C2).

mod error;
mod load;
mod model;
pub mod template;
pub mod validate;

pub use error::{ConfigError, ConfigErrorKind, RenderError};
pub use load::load_recipe;
pub use model::{
    AdapterSpec, ApiCallStep, BackoffKind, Capture, ClientConfig, Discovery, HttpMethod, LogLevel,
    LogStep, ManifestSource, Metadata, NestedDiscovery, ParamInput, ParamStep, ParamType,
    PayloadStep, Recipe, ResourceStep, Spec, Step, StepKind, GENERATION_ANNOTATION_KEY,
};
