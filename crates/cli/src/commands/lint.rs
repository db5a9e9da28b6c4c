// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reconctl lint` — the optional semantic pass `reconadapter_recipe::validate`
//! deliberately defers to a caller holding an expression evaluator.
//!
//! Walks every template and expression a recipe carries against an empty
//! scope. A template with an unresolved variable is expected (most resolve
//! only once a real event arrives) and is not reported; a parse error or an
//! unknown filter is an authoring mistake and becomes a warning. Nothing
//! here ever fails the process — `reconctl validate` is the pass with exit
//! code authority.

use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use clap::Args;
use indexmap::IndexMap;
use reconadapter_core::{Scope, Value};
use reconadapter_recipe::{load_recipe, template, ManifestSource, ParamInput, Recipe, StepKind};
use regex::Regex;

const KNOWN_FILTERS: &[&str] = &["default", "lower", "upper", "date"];

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([^}]+?)\s*\}\}").expect("constant regex pattern is valid"));

#[derive(Args)]
pub struct LintArgs {
    /// Deployment-level recipe document
    pub deployment: PathBuf,
    /// Optional task-level recipe document, merged over the deployment one
    pub task: Option<PathBuf>,
}

pub fn run(args: LintArgs) -> Result<()> {
    let deployment = std::fs::read_to_string(&args.deployment)
        .with_context(|| format!("reading '{}'", args.deployment.display()))?;
    let task = args
        .task
        .as_ref()
        .map(std::fs::read_to_string)
        .transpose()
        .with_context(|| "reading task recipe")?;

    let recipe = load_recipe(&deployment, task.as_deref())?;
    let warnings = lint_recipe(&recipe);

    if warnings.is_empty() {
        println!("{}: no semantic warnings", recipe.metadata.name);
        return Ok(());
    }
    for w in &warnings {
        println!("warning: {w}");
    }
    println!("{}: {} warning(s)", recipe.metadata.name, warnings.len());
    Ok(())
}

fn lint_recipe(recipe: &Recipe) -> Vec<String> {
    let scope = Scope::root(Value::Map(IndexMap::new()));
    let mut warnings = Vec::new();

    for step in &recipe.spec.steps {
        let where_ = |field: &str| format!("step '{}' {field}", step.name);

        if let Some(expr) = &step.when {
            check_expr(expr, &where_("when"), &mut warnings);
        }

        match &step.kind {
            StepKind::Param(param) => {
                if let ParamInput::Expression(expr) = &param.input {
                    check_expr(expr, &where_("param.expression"), &mut warnings);
                }
            }
            StepKind::ApiCall(api) => {
                check_template(&api.url, &scope, &where_("apiCall.url"), &mut warnings);
                for (name, value) in &api.headers {
                    check_template(value, &scope, &where_(&format!("apiCall.headers.{name}")), &mut warnings);
                }
                for capture in &api.capture {
                    if let Some(expr) = &capture.expression {
                        check_expr(expr, &where_(&format!("apiCall.capture.{}", capture.name)), &mut warnings);
                    }
                }
            }
            StepKind::Resource(resource) => {
                if let ManifestSource::Path(path) = &resource.manifest {
                    check_template(path, &scope, &where_("resource.manifestPath"), &mut warnings);
                }
            }
            StepKind::Payload(payload) => {
                check_payload_tree(&payload.tree, &where_("payload"), &mut warnings);
            }
            StepKind::Log(log) => {
                check_template(&log.message, &scope, &where_("log.message"), &mut warnings);
            }
        }
    }

    warnings
}

fn check_payload_tree(tree: &Value, where_: &str, warnings: &mut Vec<String>) {
    let scope = Scope::root(Value::Map(IndexMap::new()));
    match tree {
        Value::Map(map) if is_descriptor(map) => {
            if let Some(Value::String(expr)) = map.get("expression") {
                check_expr(expr, where_, warnings);
            }
        }
        Value::Map(map) => {
            for (key, value) in map {
                check_template(key, &scope, where_, warnings);
                check_payload_tree(value, &format!("{where_}.{key}"), warnings);
            }
        }
        Value::List(items) => {
            for (idx, item) in items.iter().enumerate() {
                check_payload_tree(item, &format!("{where_}[{idx}]"), warnings);
            }
        }
        Value::String(s) => check_template(s, &scope, where_, warnings),
        _ => {}
    }
}

fn is_descriptor(map: &IndexMap<String, Value>) -> bool {
    let has_field_or_expression = map.contains_key("field") || map.contains_key("expression");
    has_field_or_expression && map.keys().all(|k| k == "field" || k == "expression" || k == "default")
}

fn check_expr(expr: &str, where_: &str, warnings: &mut Vec<String>) {
    if let Err(e) = reconadapter_expr::parse(expr) {
        warnings.push(format!("{where_}: {e}"));
    }
}

fn check_template(tpl: &str, scope: &std::rc::Rc<Scope>, where_: &str, warnings: &mut Vec<String>) {
    match template::render(tpl, scope) {
        Ok(_) | Err(reconadapter_recipe::RenderError::MissingVariable(_)) => {}
        Err(e) => warnings.push(format!("{where_}: {e}")),
    }
    // `template::render` only validates a filter name once the variable it
    // follows has resolved, which an empty lint-time scope rarely satisfies.
    // Check filter names against the closed set independently so a typo'd
    // filter is caught even when everything upstream is event-scoped.
    for caps in PLACEHOLDER.captures_iter(tpl) {
        let Some(inner) = caps.get(1).map(|g| g.as_str()) else { continue };
        for filter in inner.split('|').skip(1) {
            let name = filter.trim().split_whitespace().next().unwrap_or("");
            if !KNOWN_FILTERS.contains(&name) {
                warnings.push(format!("{where_}: unknown filter '{name}'"));
            }
        }
    }
}

#[cfg(test)]
#[path = "lint_tests.rs"]
mod tests;
