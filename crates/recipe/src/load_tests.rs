// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const MINIMAL: &str = r#"
metadata:
  name: abc
spec:
  steps:
- name: set-cluster-id
  param:
    source: event.id
"#;

#[test]
fn loads_a_minimal_recipe() {
    let recipe = load_recipe(MINIMAL, None).expect("loads");
    assert_eq!(recipe.metadata.name, "abc");
    assert_eq!(recipe.spec.steps.len(), 1);
}

#[test]
fn task_level_steps_append_after_deployment_level_steps() {
    let task = r#"
spec:
  steps:
- name: log-done
  log:
    message: "done"
"#;
    let recipe = load_recipe(MINIMAL, Some(task)).expect("loads");
    assert_eq!(recipe.spec.steps.len(), 2);
    assert_eq!(recipe.spec.steps[1].name, "log-done");
}

#[test]
fn rejects_a_step_with_two_kinds_set() {
    let doc = r#"
metadata:
  name: abc
spec:
  steps:
- name: bad
  log:
    message: "x"
  param:
    value: 1
"#;
    let err = load_recipe(doc, None).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Structural {
            kind: ConfigErrorKind::MutuallyExclusive,
            ..
        }
    ));
}

#[test]
fn rejects_unknown_top_level_fields() {
    let doc = r#"
metadata:
  name: abc
bogus: true
"#;
    assert!(load_recipe(doc, None).is_err());
}
