// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Print a serializable value as pretty JSON, or fall back to its `Debug`
/// rendering in text mode — `reconctl` has no tabular output of its own,
/// unlike a daemon-backed CLI with live entities to list.
pub fn print_result<T: serde::Serialize + std::fmt::Debug>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => println!("{value:#?}"),
    }
    Ok(())
}
