// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_ternary_and_comparison() {
    let ast = parse(r#"ready == "True" ? 1 : 0"#).expect("parses");
    assert!(matches!(ast, Ast::Ternary { .. }));
}

#[test]
fn parses_safe_chain_with_or_value() {
    let ast = parse(r#"a.?b.?c.orValue("fallback")"#).expect("parses");
    assert!(matches!(ast, Ast::MethodCall { method, .. } if method == "orValue"));
}

#[test]
fn parses_filter_method_call() {
    let ast = parse(r#"status.conditions.filter(c, c.type == "Ready")[0].status"#)
        .expect("parses");
    assert!(matches!(ast, Ast::Field { .. }));
}

#[test]
fn rejects_trailing_garbage() {
    assert!(parse("1 2").is_err());
}
