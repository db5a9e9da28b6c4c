// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The variable scope threaded through templates, expressions and the
//! payload builder.
//!
//! A persistent linked list rather than a cloned map: `filter`/`exists`
//! bind a loop variable per element without copying the enclosing frame,
//! and the root frame (one per event) is shared read-only by every step.

use std::rc::Rc;

use crate::value::Value;

#[derive(Debug)]
pub enum Scope {
    Root(Value),
    Child {
        parent: Rc<Scope>,
        name: String,
        value: Value,
    },
}

impl Scope {
    pub fn root(value: Value) -> Rc<Scope> {
        Rc::new(Scope::Root(value))
    }

    pub fn child(parent: &Rc<Scope>, name: impl Into<String>, value: Value) -> Rc<Scope> {
        Rc::new(Scope::Child {
            parent: Rc::clone(parent),
            name: name.into(),
            value,
        })
    }

    /// Resolve a top-level name, walking child bindings before the root map.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        match self {
            Scope::Root(root) => root.as_map().and_then(|m| m.get(name)),
            Scope::Child {
                parent,
                name: bound,
                value,
            } => {
                if bound == name {
                    Some(value)
                } else {
                    parent.lookup(name)
                }
            }
        }
    }

    /// Resolve a dotted path (`status.phase`) against the scope: the first
    /// segment is a top-level name, the rest walk nested maps.
    pub fn lookup_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.splitn(2, '.');
        let head = parts.next()?;
        let value = self.lookup(head)?;
        match parts.next() {
            Some(rest) => value.get_path(rest),
            None => Some(value),
        }
    }
}

#[cfg(test)]
#[path = "scope_tests.rs"]
mod tests;
