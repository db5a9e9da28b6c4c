// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-apply discovery (spec §4.7): re-read a resource so server-populated
//! fields (status, observed generation, UID) flow back into the context.

use reconadapter_core::Value;
use reconadapter_recipe::Discovery as RecipeDiscovery;
use reconadapter_transport::{Gvk, Selector, Transport};

use crate::error::{StepError, StepErrorKind};
use crate::lifecycle::generation_of;

/// Top-level discovery: a transport `get`/`list` call, per spec §4.7
/// "By name" / "By selector".
pub async fn discover(
    transport: &dyn Transport,
    gvk: &Gvk,
    discovery: &RecipeDiscovery,
    fallback_namespace: Option<&str>,
) -> Result<Value, StepError> {
    match discovery {
        RecipeDiscovery::ByName(name) => transport
            .get(gvk, fallback_namespace, name)
            .await?
            .ok_or_else(|| {
                StepError::new(StepErrorKind::Transport, format!("discovery by name '{name}' found nothing"))
            }),
        RecipeDiscovery::BySelectors { label_selector, namespace } => {
            let selector = Selector {
                gvk: gvk.clone(),
                label_selector: label_selector.clone(),
                namespace: namespace.clone().or_else(|| fallback_namespace.map(str::to_string)),
            };
            let items = transport.discover(&selector).await?;
            tiebreak(items).ok_or_else(|| {
                StepError::new(
                    StepErrorKind::Transport,
                    format!("discovery by selector '{label_selector}' matched nothing"),
                )
            })
        }
    }
}

/// Nested discovery inspects the `children` array already present on the
/// container's resulting object (spec §4.7 "Nested discoveries inspect
/// sub-elements of a container manifest"). No additional transport call is
/// made; a miss is non-fatal per spec — callers simply don't bind the name.
pub fn nested_discover(resulting_object: &Value, discovery: &RecipeDiscovery) -> Option<Value> {
    let children = resulting_object.get_path("children").and_then(Value::as_list)?;
    match discovery {
        RecipeDiscovery::ByName(name) => children
            .iter()
            .find(|child| child.get_path("metadata.name").and_then(Value::as_str) == Some(name.as_str()))
            .cloned(),
        RecipeDiscovery::BySelectors { label_selector, .. } => {
            let wanted = parse_selector(label_selector);
            let matches: Vec<Value> = children
                .iter()
                .filter(|child| matches_labels(child, &wanted))
                .cloned()
                .collect();
            tiebreak(matches)
        }
    }
}

fn parse_selector(label_selector: &str) -> Vec<(&str, &str)> {
    label_selector.split(',').filter_map(|pair| pair.split_once('=')).collect()
}

fn matches_labels(object: &Value, wanted: &[(&str, &str)]) -> bool {
    let labels = object.get_path("metadata.labels").and_then(Value::as_map);
    wanted
        .iter()
        .all(|(k, v)| labels.and_then(|m| m.get(*k)).and_then(Value::as_str) == Some(*v))
}

/// Deterministic selection among multiple matches: highest generation
/// annotation, tiebreak lexicographically by the smallest name (spec §4.7,
/// §8 invariant 7).
fn tiebreak(items: Vec<Value>) -> Option<Value> {
    items.into_iter().max_by(|a, b| {
        let by_generation = generation_of(a).cmp(&generation_of(b));
        if by_generation != std::cmp::Ordering::Equal {
            return by_generation;
        }
        let name_a = a.get_path("metadata.name").and_then(Value::as_str).unwrap_or_default();
        let name_b = b.get_path("metadata.name").and_then(Value::as_str).unwrap_or_default();
        // Smaller name should win the tie; reverse the comparison so
        // `max_by` favors it.
        name_b.cmp(name_a)
    })
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
