// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Structural validation, grounded on the teacher's `validate.rs`: small,
//! single-purpose `validate_*` functions rather than one monolithic check.

use reconadapter_core::{dns, Value};

use crate::error::{ConfigError, ConfigErrorKind};
use crate::model::{ManifestSource, Recipe, ResourceStep, Step, StepKind, GENERATION_ANNOTATION_KEY};

/// Run every structural check spec.md §4.1 names. Does not look at
/// templates or expressions — that is an optional semantic pass layered on
/// top by callers that have an expression evaluator available (`reconctl
/// lint`), since this crate intentionally does not depend on
/// `reconadapter-expr`.
pub fn check(recipe: &Recipe) -> Result<(), ConfigError> {
    validate_metadata_name(recipe)?;
    for (idx, step) in recipe.spec.steps.iter().enumerate() {
        validate_step_name(step, idx)?;
        if let StepKind::Resource(resource) = &step.kind {
            validate_resource_manifest(resource, idx)?;
        }
    }
    Ok(())
}

fn validate_metadata_name(recipe: &Recipe) -> Result<(), ConfigError> {
    if recipe.metadata.name.is_empty() {
        return Err(ConfigError::structural(
            "metadata.name",
            ConfigErrorKind::MissingField,
            "metadata.name is required",
        ));
    }
    if !dns::is_dns_label(&recipe.metadata.name) {
        return Err(ConfigError::structural(
            "metadata.name",
            ConfigErrorKind::InvalidName,
            format!(
                "'{}' is not a valid DNS-1123 label",
                recipe.metadata.name
            ),
        ));
    }
    Ok(())
}

fn validate_step_name(step: &Step, idx: usize) -> Result<(), ConfigError> {
    if step.name.is_empty() {
        return Err(ConfigError::structural(
            format!("spec.steps[{idx}]"),
            ConfigErrorKind::MissingField,
            "step name is required",
        ));
    }
    Ok(())
}

fn validate_resource_manifest(resource: &ResourceStep, idx: usize) -> Result<(), ConfigError> {
    let path = format!("spec.steps[{idx}].resource.manifest");
    let manifest = match &resource.manifest {
        ManifestSource::Inline(v) => v,
        // External-path manifests are only known at render time; they are
        // validated when the payload builder resolves the path, not here.
        ManifestSource::Path(_) => return Ok(()),
    };
    validate_manifest(manifest, &path)
}

fn validate_manifest(manifest: &Value, path: &str) -> Result<(), ConfigError> {
    let map = manifest.as_map().ok_or_else(|| {
        ConfigError::structural(
            path,
            ConfigErrorKind::InvalidManifest,
            "manifest must be a mapping",
        )
    })?;

    if !map.contains_key("apiVersion") {
        return Err(ConfigError::structural(
            path,
            ConfigErrorKind::MissingField,
            "manifest is missing 'apiVersion'",
        ));
    }
    if !map.contains_key("kind") {
        return Err(ConfigError::structural(
            path,
            ConfigErrorKind::MissingField,
            "manifest is missing 'kind'",
        ));
    }

    let name = manifest.get_path("metadata.name").and_then(Value::as_str);
    if !matches!(name, Some(s) if !s.is_empty()) {
        return Err(ConfigError::structural(
            path,
            ConfigErrorKind::MissingField,
            "manifest is missing 'metadata.name'",
        ));
    }

    let generation = manifest
        .get_path("metadata.annotations")
        .and_then(Value::as_map)
        .and_then(|m| m.get(GENERATION_ANNOTATION_KEY));

    let generation = match generation {
        Some(Value::String(s)) => s.parse::<i64>().ok(),
        Some(Value::Int(n)) => Some(*n),
        _ => None,
    };

    match generation {
        Some(n) if n >= 1 => Ok(()),
        _ => Err(ConfigError::structural(
            path,
            ConfigErrorKind::InvalidAnnotation,
            format!(
                "manifest annotation '{GENERATION_ANNOTATION_KEY}' must be a decimal integer >= 1"
            ),
        )),
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
