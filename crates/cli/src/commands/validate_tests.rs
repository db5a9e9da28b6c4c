// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::io::Write;

fn write_recipe(dir: &tempfile::TempDir, name: &str, yaml: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = std::fs::File::create(&path).unwrap();
    f.write_all(yaml.as_bytes()).unwrap();
    path
}

const VALID: &str = r#"
metadata:
  name: sample
spec:
  adapter:
    version: "1"
  steps:
    - name: say-hello
      log:
        level: info
        message: "hello"
"#;

#[test]
fn accepts_a_structurally_valid_recipe() {
    let dir = tempfile::tempdir().unwrap();
    let deployment = write_recipe(&dir, "deployment.yaml", VALID);
    let args = ValidateArgs { deployment, task: None };
    assert!(run(args).is_ok());
}

#[test]
fn rejects_a_missing_metadata_name() {
    let dir = tempfile::tempdir().unwrap();
    let bad = VALID.replace("name: sample", "name: \"\"");
    let deployment = write_recipe(&dir, "deployment.yaml", &bad);
    let args = ValidateArgs { deployment, task: None };
    assert!(run(args).is_err());
}
