// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `reconctl validate` — structural recipe checks only (spec §4.1). Never
//! touches templates or expressions; see [`crate::commands::lint`] for that.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use reconadapter_recipe::{load_recipe, validate};

#[derive(Args)]
pub struct ValidateArgs {
    /// Deployment-level recipe document
    pub deployment: PathBuf,
    /// Optional task-level recipe document, merged over the deployment one
    pub task: Option<PathBuf>,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let deployment = std::fs::read_to_string(&args.deployment)
        .with_context(|| format!("reading '{}'", args.deployment.display()))?;
    let task = args
        .task
        .as_ref()
        .map(std::fs::read_to_string)
        .transpose()
        .with_context(|| "reading task recipe")?;

    let recipe = load_recipe(&deployment, task.as_deref())?;
    validate::check(&recipe)?;
    println!("{}: structurally valid ({} steps)", recipe.metadata.name, recipe.spec.steps.len());
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
