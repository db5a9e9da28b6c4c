// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed expression errors (spec §4.3: `ExprError{kind, detail}`).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprErrorKind {
    Parse,
    Type,
    MissingField,
    Division,
    Overflow,
}

impl std::fmt::Display for ExprErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExprErrorKind::Parse => "parse",
            ExprErrorKind::Type => "type",
            ExprErrorKind::MissingField => "missing_field",
            ExprErrorKind::Division => "division",
            ExprErrorKind::Overflow => "overflow",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {detail}")]
pub struct ExprError {
    pub kind: ExprErrorKind,
    pub detail: String,
}

impl ExprError {
    pub fn new(kind: ExprErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn parse(detail: impl Into<String>) -> Self {
        Self::new(ExprErrorKind::Parse, detail)
    }

    pub fn type_error(detail: impl Into<String>) -> Self {
        Self::new(ExprErrorKind::Type, detail)
    }

    pub fn missing_field(detail: impl Into<String>) -> Self {
        Self::new(ExprErrorKind::MissingField, detail)
    }

    pub fn division(detail: impl Into<String>) -> Self {
        Self::new(ExprErrorKind::Division, detail)
    }

    pub fn overflow(detail: impl Into<String>) -> Self {
        Self::new(ExprErrorKind::Overflow, detail)
    }
}
