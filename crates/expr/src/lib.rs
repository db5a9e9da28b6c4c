// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded, side-effect-free expression language used by `when` guards,
//! template interpolations and payload leaves.
//!
//! The grammar is deliberately small: no loops, no user-defined functions,
//! no I/O, no access to wall-clock or environment. A recipe author gets
//! field access (with an explicit safe-access operator, `.?`, for optional
//! paths), comparisons, boolean and arithmetic operators, and a handful of
//! collection helpers (`filter`, `exists`, `size`) plus two diagnostic
//! builtins (`has`, `toJson`).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

mod ast;
mod error;
mod eval;
mod lexer;
mod parser;

pub use ast::Ast;
pub use error::{ExprError, ExprErrorKind};
pub use eval::{eval, evaluate, EvalResult};
pub use parser::parse;
pub use reconadapter_core::Scope;
