// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mustache-style variable interpolation — `{{ .var.path }}` with a closed
//! set of pipe filters (`lower`, `upper`, `date "layout"`, `default "x"`).
//!
//! Grounded on the teacher's `${var}` interpolator (same `LazyLock<Regex>`
//! shape, same "first pass finds placeholders, second resolves them" split)
//! but ported to the dotted-path grammar and typed-value semantics this
//! engine needs: a placeholder resolves to a [`Value`], not a pre-stringified
//! fragment, so filters and the final render both see the real type.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use reconadapter_core::{Scope, Value};
use regex::Regex;

use crate::error::RenderError;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^}]+?)\s*\}\}").expect("constant regex pattern is valid"));

/// Render every `{{ ... }}` placeholder in `tpl` against `scope`.
///
/// Strict mode: an unresolved variable with no `default` filter is a
/// [`RenderError::MissingVariable`], not a silent empty substitution.
pub fn render(tpl: &str, scope: &Scope) -> Result<String, RenderError> {
    let mut out = String::with_capacity(tpl.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(tpl) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&tpl[last..whole.start()]);
        let inner = caps.get(1).map(|g| g.as_str()).unwrap_or("");
        out.push_str(&render_placeholder(inner, scope)?.to_display_string());
        last = whole.end();
    }
    out.push_str(&tpl[last..]);
    Ok(out)
}

fn render_placeholder(inner: &str, scope: &Scope) -> Result<Value, RenderError> {
    let mut segments = inner.split('|').map(str::trim);
    let path_part = segments.next().unwrap_or("");
    let path = path_part.strip_prefix('.').ok_or_else(|| {
        RenderError::InvalidFilterArg(format!(
            "expected a path starting with '.', found '{path_part}'"
        ))
    })?;

    let mut value = scope.lookup_path(path).cloned();
    for filter in segments {
        value = Some(apply_filter(filter, value, path)?);
    }
    value.ok_or_else(|| RenderError::MissingVariable(path.to_string()))
}

fn apply_filter(filter: &str, value: Option<Value>, path: &str) -> Result<Value, RenderError> {
    let (name, arg) = split_filter(filter)?;
    if name == "default" {
        return match value {
            Some(v) => Ok(v),
            None => {
                let arg = arg.ok_or_else(|| {
                    RenderError::InvalidFilterArg("default filter requires a quoted argument".into())
                })?;
                Ok(Value::String(arg))
            }
        };
    }

    let value = value.ok_or_else(|| RenderError::MissingVariable(path.to_string()))?;
    match name {
        "lower" => Ok(Value::String(value.to_display_string().to_lowercase())),
        "upper" => Ok(Value::String(value.to_display_string().to_uppercase())),
        "date" => {
            let layout = arg.ok_or_else(|| {
                RenderError::InvalidFilterArg("date filter requires a quoted layout argument".into())
            })?;
            let dt = value_to_datetime(&value).ok_or_else(|| {
                RenderError::InvalidFilterArg(format!(
                    "'{path}' is not a timestamp: {}",
                    value.to_display_string()
                ))
            })?;
            Ok(Value::String(dt.format(&translate_go_layout(&layout)).to_string()))
        }
        other => Err(RenderError::UnknownFilter(other.to_string())),
    }
}

/// Split `date "2006-01-02"` into `("date", Some("2006-01-02"))`, or
/// `lower` into `("lower", None)`.
fn split_filter(filter: &str) -> Result<(&str, Option<String>), RenderError> {
    match filter.split_once(char::is_whitespace) {
        None => Ok((filter, None)),
        Some((name, rest)) => {
            let rest = rest.trim();
            let arg = rest
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .ok_or_else(|| {
                    RenderError::InvalidFilterArg(format!(
                        "filter argument must be a double-quoted string, found '{rest}'"
                    ))
                })?;
            Ok((name, Some(arg.to_string())))
        }
    }
}

fn value_to_datetime(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Int(epoch_seconds) => Utc.timestamp_opt(*epoch_seconds, 0).single(),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    }
}

/// Translate a Go-style reference-time layout (`2006-01-02 15:04:05 MST`)
/// into a chrono `strftime` format string. Longest/most specific tokens are
/// replaced first so e.g. `2006` never gets clobbered by a later `06` pass.
fn translate_go_layout(layout: &str) -> String {
    const TOKENS: &[(&str, &str)] = &[
        ("2006", "%Y"),
        ("-0700", "%z"),
        ("Z07:00", "%:z"),
        ("January", "%B"),
        ("Monday", "%A"),
        ("Jan", "%b"),
        ("Mon", "%a"),
        ("MST", "%Z"),
        ("15", "%H"),
        ("01", "%m"),
        ("02", "%d"),
        ("03", "%I"),
        ("04", "%M"),
        ("05", "%S"),
        ("PM", "%p"),
    ];
    let mut out = layout.to_string();
    for (go, strftime) in TOKENS {
        out = out.replace(go, strftime);
    }
    out
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
