// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: `RECONADAPTER_`-prefixed environment variables
//! layered over an optional TOML file (spec §3 ambient "Configuration").
//!
//! Grounded on `oj-daemon/src/env.rs`'s env-var-first resolution chain;
//! generalized to a typed struct with a file-backed default layer
//! underneath, since this daemon (unlike `ojd`) ships one config document
//! per deployment rather than fixed XDG paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{0}")]
    Invalid(String),
}

/// On-disk TOML shape. Every field is optional — a missing file is
/// equivalent to one with every field absent, and env vars always win.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bind: Option<String>,
    event_source_path: Option<String>,
    deployment_recipe_path: Option<String>,
    task_recipe_path: Option<String>,
    default_namespace: Option<String>,
    client_cert_path: Option<String>,
    client_key_path: Option<String>,
    event_deadline_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Health/metrics HTTP bind address (default `0.0.0.0:9090`).
    pub bind: String,
    /// Newline-delimited-JSON event source: a file path, or `-` for stdin.
    pub event_source_path: String,
    /// Deployment-level recipe document.
    pub deployment_recipe_path: PathBuf,
    /// Optional task-level recipe document, merged over the deployment one.
    pub task_recipe_path: Option<PathBuf>,
    /// Namespace used when a manifest sets none.
    pub default_namespace: Option<String>,
    /// mTLS client certificate/key pair for `APIClient` calls.
    pub client_cert_path: Option<PathBuf>,
    pub client_key_path: Option<PathBuf>,
    /// Per-event cancellation deadline (spec §5).
    pub event_deadline: Duration,
}

const ENV_PREFIX: &str = "RECONADAPTER_";

impl Config {
    /// Load `RECONADAPTER_CONFIG_FILE` (or `./reconadapter.toml` if unset)
    /// as the default layer, then apply any `RECONADAPTER_*` environment
    /// variable on top.
    pub fn load() -> Result<Self, ConfigError> {
        let file_path = std::env::var(format!("{ENV_PREFIX}CONFIG_FILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("reconadapter.toml"));
        let file = read_file_config(&file_path)?;

        let deployment_recipe_path = env_var("DEPLOYMENT_RECIPE")
            .map(PathBuf::from)
            .or_else(|| file.deployment_recipe_path.map(PathBuf::from))
            .ok_or_else(|| {
                ConfigError::Invalid(
                    "deployment recipe path is required (RECONADAPTER_DEPLOYMENT_RECIPE or config file)"
                        .to_string(),
                )
            })?;

        Ok(Self {
            bind: env_var("BIND").or(file.bind).unwrap_or_else(|| "0.0.0.0:9090".to_string()),
            event_source_path: env_var("EVENT_SOURCE")
                .or(file.event_source_path)
                .unwrap_or_else(|| "-".to_string()),
            deployment_recipe_path,
            task_recipe_path: env_var("TASK_RECIPE")
                .map(PathBuf::from)
                .or_else(|| file.task_recipe_path.map(PathBuf::from)),
            default_namespace: env_var("DEFAULT_NAMESPACE").or(file.default_namespace),
            client_cert_path: env_var("CLIENT_CERT").map(PathBuf::from).or_else(|| file.client_cert_path.map(PathBuf::from)),
            client_key_path: env_var("CLIENT_KEY").map(PathBuf::from).or_else(|| file.client_key_path.map(PathBuf::from)),
            event_deadline: env_var("EVENT_DEADLINE_MS")
                .and_then(|s| s.parse::<u64>().ok())
                .or(file.event_deadline_ms)
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_secs(30)),
        })
    }
}

fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{suffix}")).ok()
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => toml::from_str(&raw).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(source) => Err(ConfigError::Read { path: path.to_path_buf(), source }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
