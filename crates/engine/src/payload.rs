// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Payload builder (spec §4.8): recursively realize a payload skeleton,
//! preserving numeric leaf types all the way to JSON serialization (spec
//! §8 invariant 4, §9 "Numeric preservation is the easiest correctness trap").

use std::rc::Rc;

use reconadapter_core::{Scope, Value};
use reconadapter_expr::evaluate;
use reconadapter_recipe::template;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("template error: {0}")]
    Render(#[from] reconadapter_recipe::RenderError),
    #[error("expression error: {0}")]
    Expression(#[from] reconadapter_expr::ExprError),
}

/// Realize `tree` against `scope`. Map nodes whose key set is a subset of
/// `{field, expression, default}` (and contains at least one of the first
/// two) are value descriptors, not plain maps — everything else recurses
/// structurally.
pub fn realize(tree: &Value, scope: &Rc<Scope>) -> Result<Value, PayloadError> {
    match tree {
        Value::Map(map) if is_descriptor(map) => realize_descriptor(map, scope),
        Value::Map(map) => {
            let mut out = indexmap::IndexMap::with_capacity(map.len());
            for (key, value) in map {
                let rendered_key = template::render(key, scope)?;
                out.insert(rendered_key, realize(value, scope)?);
            }
            Ok(Value::Map(out))
        }
        Value::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(realize(item, scope)?);
            }
            Ok(Value::List(out))
        }
        Value::String(s) => Ok(Value::String(template::render(s, scope)?)),
        scalar => Ok(scalar.clone()),
    }
}

fn is_descriptor(map: &indexmap::IndexMap<String, Value>) -> bool {
    let has_field_or_expression = map.contains_key("field") || map.contains_key("expression");
    has_field_or_expression
        && map.keys().all(|k| k == "field" || k == "expression" || k == "default")
}

fn realize_descriptor(map: &indexmap::IndexMap<String, Value>, scope: &Rc<Scope>) -> Result<Value, PayloadError> {
    let resolved = if let Some(Value::String(expr)) = map.get("expression") {
        Some(evaluate(expr, scope)?.value)
    } else if let Some(Value::String(path)) = map.get("field") {
        scope.lookup_path(path).cloned()
    } else {
        None
    };
    match resolved {
        Some(Value::Null) | None => Ok(map.get("default").cloned().unwrap_or(Value::Null)),
        Some(v) => Ok(v),
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
