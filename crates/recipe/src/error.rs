// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recipe loading and template-rendering errors.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigErrorKind {
    MissingField,
    MutuallyExclusive,
    InvalidManifest,
    InvalidAnnotation,
    InvalidName,
}

impl std::fmt::Display for ConfigErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConfigErrorKind::MissingField => "missing_field",
            ConfigErrorKind::MutuallyExclusive => "mutually_exclusive",
            ConfigErrorKind::InvalidManifest => "invalid_manifest",
            ConfigErrorKind::InvalidAnnotation => "invalid_annotation",
            ConfigErrorKind::InvalidName => "invalid_name",
        };
        f.write_str(s)
    }
}

/// A recipe failed to load or validate. Fatal: the adapter refuses to run
/// until the document is fixed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{path}: {kind}: {detail}")]
    Structural {
        path: String,
        kind: ConfigErrorKind,
        detail: String,
    },
}

impl ConfigError {
    pub fn structural(
        path: impl Into<String>,
        kind: ConfigErrorKind,
        detail: impl Into<String>,
    ) -> Self {
        ConfigError::Structural {
            path: path.into(),
            kind,
            detail: detail.into(),
        }
    }
}

/// A template referenced an undefined variable, or used the pipe grammar
/// incorrectly. Raised in strict mode (payload assembly, URL rendering);
/// downgraded to a warning in the optional semantic pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("undefined variable '{0}'")]
    MissingVariable(String),

    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    #[error("invalid filter argument: {0}")]
    InvalidFilterArg(String),
}
