// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tree-walking evaluator.
//!
//! The central design tension is safe-access (`.?`): a field lookup that
//! fails partway through a chain must not raise, it must flow an "absent"
//! marker out to whatever finally consumes it (`orValue()`, `has()`, or the
//! top-level result). [`Outcome`] carries that marker through evaluation;
//! every node that *requires* a concrete value (arithmetic, comparisons,
//! list/map literals) calls [`require`] to collapse it back into a value or
//! a `MissingField` error.

use std::rc::Rc;

use indexmap::IndexMap;
use reconadapter_core::{Scope, Type, Value};

use crate::ast::{Ast, BinOp, UnaryOp};
use crate::error::ExprError;
use crate::parser::parse;

/// Result of evaluating a fully-resolved expression.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalResult {
    pub value: Value,
    pub ty: Type,
}

/// A value that may or may not have resolved, tracked through safe-access
/// chains. Never surfaces outside this module except via [`require`].
#[derive(Debug, Clone)]
enum Outcome {
    Present(Value),
    Absent,
}

/// Controls whether an ordinarily-fatal missing field becomes [`Outcome::Absent`]
/// instead of raising. Set while evaluating the argument to `has()`, and
/// implicitly for any access reached through a `.?` hop.
#[derive(Debug, Clone, Copy)]
struct EvalCtx {
    lenient: bool,
}

impl EvalCtx {
    fn strict() -> Self {
        EvalCtx { lenient: false }
    }

    fn lenient() -> Self {
        EvalCtx { lenient: true }
    }
}

/// Parse and evaluate `src` against `scope` in one call.
pub fn evaluate(src: &str, scope: &Rc<Scope>) -> Result<EvalResult, ExprError> {
    let ast = parse(src)?;
    eval(&ast, scope)
}

/// Evaluate an already-parsed [`Ast`] against `scope`.
pub fn eval(ast: &Ast, scope: &Rc<Scope>) -> Result<EvalResult, ExprError> {
    let outcome = eval_node(ast, scope, EvalCtx::strict())?;
    let value = require(outcome)?;
    let ty = value.ty();
    Ok(EvalResult { value, ty })
}

fn require(outcome: Outcome) -> Result<Value, ExprError> {
    match outcome {
        Outcome::Present(v) => Ok(v),
        Outcome::Absent => Err(ExprError::missing_field(
            "value is absent; use .orValue() to supply a fallback before using it here",
        )),
    }
}

fn eval_node(node: &Ast, scope: &Rc<Scope>, ctx: EvalCtx) -> Result<Outcome, ExprError> {
    match node {
        Ast::Literal(v) => Ok(Outcome::Present(v.clone())),

        Ast::Ident(name) => match scope.lookup(name) {
            Some(v) => Ok(Outcome::Present(v.clone())),
            None if ctx.lenient => Ok(Outcome::Absent),
            None => Err(ExprError::missing_field(format!("undefined variable '{name}'"))),
        },

        Ast::Field { base, name, safe } => {
            let base_outcome = eval_node(base, scope, ctx)?;
            let base_val = match base_outcome {
                Outcome::Absent => return Ok(Outcome::Absent),
                Outcome::Present(v) => v,
            };
            let lenient = ctx.lenient || *safe;
            match &base_val {
                Value::Map(m) => match m.get(name) {
                    Some(v) => Ok(Outcome::Present(v.clone())),
                    None if lenient => Ok(Outcome::Absent),
                    None => Err(ExprError::missing_field(format!("no field '{name}'"))),
                },
                Value::Null if lenient => Ok(Outcome::Absent),
                _ if lenient => Ok(Outcome::Absent),
                other => Err(ExprError::type_error(format!(
                    "cannot access field '{name}' on a value of type {}",
                    other.ty()
                ))),
            }
        }

        Ast::Index { base, index } => {
            let base_outcome = eval_node(base, scope, ctx)?;
            let base_val = match base_outcome {
                Outcome::Absent => return Ok(Outcome::Absent),
                Outcome::Present(v) => v,
            };
            let index_outcome = eval_node(index, scope, ctx)?;
            let index_val = match index_outcome {
                Outcome::Absent => return Ok(Outcome::Absent),
                Outcome::Present(v) => v,
            };
            match (&base_val, &index_val) {
                (Value::List(items), Value::Int(i)) => {
                    let idx = usize::try_from(*i).ok().filter(|idx| *idx < items.len());
                    match idx {
                        Some(idx) => Ok(Outcome::Present(items[idx].clone())),
                        None if ctx.lenient => Ok(Outcome::Absent),
                        None => Err(ExprError::missing_field(format!(
                            "index {i} out of range for a list of length {}",
                            items.len()
                        ))),
                    }
                }
                (Value::Map(m), Value::String(key)) => match m.get(key) {
                    Some(v) => Ok(Outcome::Present(v.clone())),
                    None if ctx.lenient => Ok(Outcome::Absent),
                    None => Err(ExprError::missing_field(format!("no key '{key}'"))),
                },
                _ if ctx.lenient => Ok(Outcome::Absent),
                _ => Err(ExprError::type_error(format!(
                    "cannot index a value of type {} with a value of type {}",
                    base_val.ty(),
                    index_val.ty()
                ))),
            }
        }

        Ast::List(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(require(eval_node(item, scope, ctx)?)?);
            }
            Ok(Outcome::Present(Value::List(out)))
        }

        Ast::Map(entries) => {
            let mut out = IndexMap::with_capacity(entries.len());
            for (key, value) in entries {
                out.insert(key.clone(), require(eval_node(value, scope, ctx)?)?);
            }
            Ok(Outcome::Present(Value::Map(out)))
        }

        Ast::Unary { op, expr } => {
            let v = require(eval_node(expr, scope, ctx)?)?;
            let result = match op {
                UnaryOp::Not => {
                    let b = v
                        .as_bool()
                        .ok_or_else(|| type_mismatch("!", &v))?;
                    Value::Bool(!b)
                }
                UnaryOp::Neg => match v {
                    Value::Int(i) => Value::Int(
                        i.checked_neg()
                            .ok_or_else(|| ExprError::overflow("negation overflowed i64"))?,
                    ),
                    Value::Float(f) => Value::Float(-f),
                    other => return Err(type_mismatch("-", &other)),
                },
            };
            Ok(Outcome::Present(result))
        }

        Ast::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, scope, ctx),

        Ast::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            let c = require(eval_node(cond, scope, ctx)?)?;
            let b = c.as_bool().ok_or_else(|| type_mismatch("?:", &c))?;
            if b {
                eval_node(then_branch, scope, ctx)
            } else {
                eval_node(else_branch, scope, ctx)
            }
        }

        Ast::Call { name, args } => eval_call(name, args, scope, ctx),

        Ast::MethodCall { base, method, args } => eval_method_call(base, method, args, scope, ctx),
    }
}

fn eval_binary(
    op: BinOp,
    lhs: &Ast,
    rhs: &Ast,
    scope: &Rc<Scope>,
    ctx: EvalCtx,
) -> Result<Outcome, ExprError> {
    match op {
        BinOp::And => {
            let l = require(eval_node(lhs, scope, ctx)?)?;
            let lb = l.as_bool().ok_or_else(|| type_mismatch("&&", &l))?;
            if !lb {
                return Ok(Outcome::Present(Value::Bool(false)));
            }
            let r = require(eval_node(rhs, scope, ctx)?)?;
            let rb = r.as_bool().ok_or_else(|| type_mismatch("&&", &r))?;
            Ok(Outcome::Present(Value::Bool(rb)))
        }
        BinOp::Or => {
            let l = require(eval_node(lhs, scope, ctx)?)?;
            let lb = l.as_bool().ok_or_else(|| type_mismatch("||", &l))?;
            if lb {
                return Ok(Outcome::Present(Value::Bool(true)));
            }
            let r = require(eval_node(rhs, scope, ctx)?)?;
            let rb = r.as_bool().ok_or_else(|| type_mismatch("||", &r))?;
            Ok(Outcome::Present(Value::Bool(rb)))
        }
        _ => {
            let l = require(eval_node(lhs, scope, ctx)?)?;
            let r = require(eval_node(rhs, scope, ctx)?)?;
            Ok(Outcome::Present(apply_binary(op, l, r)?))
        }
    }
}

fn apply_binary(op: BinOp, l: Value, r: Value) -> Result<Value, ExprError> {
    match op {
        BinOp::Eq => Ok(Value::Bool(l == r)),
        BinOp::Ne => Ok(Value::Bool(l != r)),
        BinOp::Add => match (&l, &r) {
            (Value::String(a), Value::String(b)) => Ok(Value::String(format!("{a}{b}"))),
            _ => numeric_binary(op, l, r),
        },
        BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => numeric_binary(op, l, r),
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => compare(op, l, r),
        BinOp::And | BinOp::Or => unreachable!("short-circuited in eval_binary"),
    }
}

fn numeric_binary(op: BinOp, l: Value, r: Value) -> Result<Value, ExprError> {
    match (l, r) {
        (Value::Int(a), Value::Int(b)) => int_binary(op, a, b),
        (Value::Int(a), Value::Float(b)) => Ok(Value::Float(float_binary(op, a as f64, b)?)),
        (Value::Float(a), Value::Int(b)) => Ok(Value::Float(float_binary(op, a, b as f64)?)),
        (Value::Float(a), Value::Float(b)) => Ok(Value::Float(float_binary(op, a, b)?)),
        (a, b) => Err(ExprError::type_error(format!(
            "cannot apply {op:?} to {} and {}",
            a.ty(),
            b.ty()
        ))),
    }
}

fn int_binary(op: BinOp, a: i64, b: i64) -> Result<Value, ExprError> {
    let result = match op {
        BinOp::Add => a.checked_add(b),
        BinOp::Sub => a.checked_sub(b),
        BinOp::Mul => a.checked_mul(b),
        BinOp::Div => {
            if b == 0 {
                return Err(ExprError::division("division by zero"));
            }
            a.checked_div(b)
        }
        BinOp::Mod => {
            if b == 0 {
                return Err(ExprError::division("modulo by zero"));
            }
            a.checked_rem(b)
        }
        _ => unreachable!("non-arithmetic op routed to int_binary"),
    };
    result
        .map(Value::Int)
        .ok_or_else(|| ExprError::overflow(format!("{a} {op:?} {b} overflowed i64")))
}

fn float_binary(op: BinOp, a: f64, b: f64) -> Result<f64, ExprError> {
    match op {
        BinOp::Add => Ok(a + b),
        BinOp::Sub => Ok(a - b),
        BinOp::Mul => Ok(a * b),
        BinOp::Div => {
            if b == 0.0 {
                Err(ExprError::division("division by zero"))
            } else {
                Ok(a / b)
            }
        }
        BinOp::Mod => {
            if b == 0.0 {
                Err(ExprError::division("modulo by zero"))
            } else {
                Ok(a % b)
            }
        }
        _ => unreachable!("non-arithmetic op routed to float_binary"),
    }
}

fn compare(op: BinOp, l: Value, r: Value) -> Result<Value, ExprError> {
    let ordering = match (&l, &r) {
        (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => {
            return Err(ExprError::type_error(format!(
                "cannot compare {} and {}",
                l.ty(),
                r.ty()
            )))
        }
    };
    let ordering = ordering.ok_or_else(|| ExprError::type_error("NaN is not orderable"))?;
    let b = match op {
        BinOp::Lt => ordering.is_lt(),
        BinOp::Le => ordering.is_le(),
        BinOp::Gt => ordering.is_gt(),
        BinOp::Ge => ordering.is_ge(),
        _ => unreachable!("non-comparison op routed to compare"),
    };
    Ok(Value::Bool(b))
}

fn type_mismatch(op: &str, v: &Value) -> ExprError {
    ExprError::type_error(format!("operator '{op}' is not defined for type {}", v.ty()))
}

fn eval_call(name: &str, args: &[Ast], scope: &Rc<Scope>, ctx: EvalCtx) -> Result<Outcome, ExprError> {
    match name {
        "has" => {
            let arg = require_arity1(args)?;
            let present = matches!(eval_node(arg, scope, EvalCtx::lenient())?, Outcome::Present(_));
            Ok(Outcome::Present(Value::Bool(present)))
        }
        "toJson" => {
            let arg = require_arity1(args)?;
            let v = match eval_node(arg, scope, ctx)? {
                Outcome::Present(v) => v,
                Outcome::Absent => Value::Null,
            };
            let json: serde_json::Value = v.into();
            let s = serde_json::to_string(&json)
                .map_err(|e| ExprError::type_error(format!("toJson: {e}")))?;
            Ok(Outcome::Present(Value::String(s)))
        }
        other => Err(ExprError::parse(format!("unknown function '{other}'"))),
    }
}

fn eval_method_call(
    base: &Ast,
    method: &str,
    args: &[Ast],
    scope: &Rc<Scope>,
    ctx: EvalCtx,
) -> Result<Outcome, ExprError> {
    if method == "orValue" {
        let fallback = require_arity1(args)?;
        return match eval_node(base, scope, ctx)? {
            Outcome::Present(v) => Ok(Outcome::Present(v)),
            Outcome::Absent => eval_node(fallback, scope, ctx),
        };
    }

    let base_val = require(eval_node(base, scope, ctx)?)?;
    match method {
        "size" => {
            let n = match &base_val {
                Value::List(l) => l.len(),
                Value::Map(m) => m.len(),
                Value::String(s) => s.chars().count(),
                other => {
                    return Err(ExprError::type_error(format!(
                        "size() is not defined for type {}",
                        other.ty()
                    )))
                }
            };
            Ok(Outcome::Present(Value::Int(n as i64)))
        }
        "filter" | "exists" => {
            let (var, predicate) = require_arity2(args)?;
            let var_name = loop_var_name(var)?;
            let items = base_val.as_list().ok_or_else(|| {
                ExprError::type_error(format!(
                    "{method}() is not defined for type {}",
                    base_val.ty()
                ))
            })?;
            if method == "exists" {
                for item in items {
                    let child = Scope::child(scope, var_name, item.clone());
                    let matched = require(eval_node(predicate, &child, ctx)?)?;
                    let b = matched
                        .as_bool()
                        .ok_or_else(|| type_mismatch("exists", &matched))?;
                    if b {
                        return Ok(Outcome::Present(Value::Bool(true)));
                    }
                }
                Ok(Outcome::Present(Value::Bool(false)))
            } else {
                let mut kept = Vec::new();
                for item in items {
                    let child = Scope::child(scope, var_name, item.clone());
                    let matched = require(eval_node(predicate, &child, ctx)?)?;
                    let b = matched
                        .as_bool()
                        .ok_or_else(|| type_mismatch("filter", &matched))?;
                    if b {
                        kept.push(item.clone());
                    }
                }
                Ok(Outcome::Present(Value::List(kept)))
            }
        }
        other => Err(ExprError::parse(format!("unknown method '.{other}()'"))),
    }
}

fn loop_var_name(ast: &Ast) -> Result<&str, ExprError> {
    match ast {
        Ast::Ident(name) => Ok(name),
        other => Err(ExprError::parse(format!(
            "expected a loop variable name, found {other:?}"
        ))),
    }
}

fn require_arity1(args: &[Ast]) -> Result<&Ast, ExprError> {
    match args {
        [only] => Ok(only),
        other => Err(ExprError::parse(format!(
            "expected 1 argument, found {}",
            other.len()
        ))),
    }
}

fn require_arity2(args: &[Ast]) -> Result<(&Ast, &Ast), ExprError> {
    match args {
        [a, b] => Ok((a, b)),
        other => Err(ExprError::parse(format!(
            "expected 2 arguments, found {}",
            other.len()
        ))),
    }
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
