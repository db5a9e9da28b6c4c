// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use reconadapter_recipe::{LogLevel, LogStep, Metadata, Spec, Step};

fn log_step(name: &str, message: &str) -> Step {
    Step {
        name: name.to_string(),
        when: None,
        kind: StepKind::Log(LogStep { level: LogLevel::Info, message: message.to_string() }),
    }
}

fn recipe(steps: Vec<Step>) -> Recipe {
    Recipe {
        metadata: Metadata { name: "sample".to_string(), labels: IndexMap::new() },
        spec: Spec { adapter: Default::default(), clients: IndexMap::new(), steps },
    }
}

#[test]
fn event_scoped_template_is_not_a_warning() {
    let r = recipe(vec![log_step("greet", "hello {{ .event.name }}")]);
    assert!(lint_recipe(&r).is_empty());
}

#[test]
fn unknown_filter_is_a_warning() {
    let r = recipe(vec![log_step("greet", "{{ .event.name | frobnicate }}")]);
    let warnings = lint_recipe(&r);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("greet"));
}

#[test]
fn malformed_when_expression_is_a_warning() {
    let mut step = log_step("greet", "hi");
    step.when = Some("status ==".to_string());
    let r = recipe(vec![step]);
    let warnings = lint_recipe(&r);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("when"));
}
