// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `param` step resolution (spec §4.3 "Param", §6 "Parameter source
//! prefixes"): `value` > `expression` > `source`, each falling back to
//! `default` on a miss, then coerced by `ty`.

use std::rc::Rc;

use reconadapter_core::{Scope, Value};
use reconadapter_expr::evaluate;
use reconadapter_recipe::{ParamInput, ParamStep, ParamType};
use reconadapter_transport::{ConfigMapStore, SecretStore};

use crate::error::{StepError, StepErrorKind};

/// What a `param` step needs from the outside world to resolve a
/// `source` input; supplied by the step executor, absent in contexts
/// (like template/payload-only tests) that never reach a `source` param.
pub struct ParamEnv<'a> {
    pub secrets: &'a dyn SecretStore,
    pub configmaps: &'a dyn ConfigMapStore,
}

pub async fn resolve(step: &ParamStep, scope: &Rc<Scope>, env: &ParamEnv<'_>) -> Result<Value, StepError> {
    let resolved = match &step.input {
        ParamInput::Value(v) => Some(v.clone()),
        ParamInput::Expression(expr) => {
            let outcome = evaluate(expr, scope);
            match outcome {
                Ok(r) => Some(r.value),
                Err(e) if e.kind == reconadapter_expr::ExprErrorKind::MissingField => None,
                Err(e) => return Err(e.into()),
            }
        }
        ParamInput::Source(source) => resolve_source(source, scope, env).await?,
    };
    let resolved = match resolved {
        Some(Value::Null) | None => step.default.clone(),
        Some(v) => Some(v),
    };
    let value = resolved.unwrap_or(Value::Null);
    match step.ty {
        Some(ty) => coerce(value, ty),
        None => Ok(value),
    }
}

async fn resolve_source(source: &str, scope: &Rc<Scope>, env: &ParamEnv<'_>) -> Result<Option<Value>, StepError> {
    if let Some(name) = source.strip_prefix("env.") {
        return Ok(std::env::var(name).ok().map(Value::String));
    }
    if let Some(path) = source.strip_prefix("event.") {
        return Ok(scope.lookup_path(&format!("event.{path}")).cloned());
    }
    if let Some(rest) = source.strip_prefix("secret.") {
        let (namespace, name, key) = split_three(rest, "secret")?;
        return match env.secrets.get(namespace, name, key).await {
            Ok(s) => Ok(Some(Value::String(s))),
            Err(reconadapter_transport::TransportError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        };
    }
    if let Some(rest) = source.strip_prefix("configmap.") {
        let (namespace, name, key) = split_three(rest, "configmap")?;
        return match env.configmaps.get(namespace, name, key).await {
            Ok(s) => Ok(Some(Value::String(s))),
            Err(reconadapter_transport::TransportError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        };
    }
    // Bare dotted path: equivalent to `event.<path>` (spec §6).
    Ok(scope.lookup_path(&format!("event.{source}")).cloned())
}

fn split_three<'a>(rest: &'a str, prefix: &str) -> Result<(&'a str, &'a str, &'a str), StepError> {
    let mut parts = rest.splitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(ns), Some(name), Some(key)) if !ns.is_empty() && !name.is_empty() && !key.is_empty() => {
            Ok((ns, name, key))
        }
        _ => Err(StepError::new(
            StepErrorKind::Internal,
            format!("malformed '{prefix}.NS.NAME.KEY' source: '{prefix}.{rest}'"),
        )),
    }
}

fn coerce(value: Value, ty: ParamType) -> Result<Value, StepError> {
    let type_error = |want: &str| {
        StepError::new(
            StepErrorKind::Internal,
            format!("cannot coerce {} to {want}", value.ty()),
        )
    };
    match ty {
        ParamType::String => Ok(Value::String(value.to_display_string())),
        ParamType::Bool => match value {
            Value::Bool(b) => Ok(Value::Bool(b)),
            Value::String(s) => s.parse::<bool>().map(Value::Bool).map_err(|_| type_error("bool")),
            _ => Err(type_error("bool")),
        },
        ParamType::Int | ParamType::Int64 => match value {
            Value::Int(i) => Ok(Value::Int(i)),
            Value::Float(f) => Ok(Value::Int(f as i64)),
            Value::String(s) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| type_error("int")),
            _ => Err(type_error("int")),
        },
        ParamType::Float | ParamType::Float64 => match value {
            Value::Float(f) => Ok(Value::Float(f)),
            Value::Int(i) => Ok(Value::Float(i as f64)),
            Value::String(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| type_error("float")),
            _ => Err(type_error("float")),
        },
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
