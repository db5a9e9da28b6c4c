// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! reconctl - local recipe authoring and validation tool for reconadapterd

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::OutputFormat;

use commands::{lint, run, validate};

#[derive(Parser)]
#[command(name = "reconctl", version, about = "Author and validate reconadapterd recipes")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a recipe against one event using in-memory fakes
    Run(run::RunArgs),
    /// Run the structural checks a loaded recipe must pass
    Validate(validate::ValidateArgs),
    /// Run the optional semantic pass over templates and expressions
    Lint(lint::LintArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => run::run(args, cli.output).await?,
        Commands::Validate(args) => validate::run(args)?,
        Commands::Lint(args) => lint::run(args)?,
    }
    Ok(())
}
