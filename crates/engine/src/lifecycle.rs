// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resource lifecycle decision (spec §4.6, the six-row create/update/
//! skip/recreate table).

use reconadapter_core::Value;
use reconadapter_transport::Operation;

use crate::error::{StepError, StepErrorKind};

/// Read the generation annotation off a manifest; `0` if absent or
/// unparseable, matching spec §4.6: "`G_old`, or 0 if absent/unparseable".
pub fn generation_of(manifest: &Value) -> i64 {
    let annotation = manifest
        .get_path("metadata.annotations")
        .and_then(Value::as_map)
        .and_then(|m| m.get(reconadapter_recipe::GENERATION_ANNOTATION_KEY));
    match annotation {
        Some(Value::Int(n)) => *n,
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    }
}

/// Decide the operation per spec §4.6's table. `existing` is `None` when
/// the transport `get` returned not-found (already translated by the
/// caller); a definitive error must be surfaced as a `StepError` before
/// this function is ever called.
pub fn decide(desired: &Value, existing: Option<&Value>, recreate_on_change: bool) -> Operation {
    let Some(existing) = existing else {
        return Operation::Create;
    };
    let g_new = generation_of(desired);
    let g_old = generation_of(existing);
    match (g_new == g_old, recreate_on_change) {
        (true, _) => Operation::Skip,
        (false, false) => Operation::Update,
        (false, true) => Operation::Recreate,
    }
}

/// Translate a definitive transport `get` failure into a `StepError`;
/// `not_found` is handled by the caller before reaching this (spec §4.6
/// "if definitive not found, proceed as non-existent").
pub fn get_error(err: reconadapter_transport::TransportError) -> StepError {
    StepError::from(err)
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
