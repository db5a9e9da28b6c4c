// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn lexes_safe_access_chain() {
    let tokens = lex("a.?b.?c").expect("lexes");
    let kinds: Vec<_> = tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident("a".into()),
            TokenKind::SafeDot,
            TokenKind::Ident("b".into()),
            TokenKind::SafeDot,
            TokenKind::Ident("c".into()),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn lexes_string_escapes() {
    let tokens = lex(r#""Rea\"dy""#).expect("lexes");
    assert_eq!(tokens[0].kind, TokenKind::Str("Rea\"dy".to_string()));
}

#[test]
fn lexes_numbers() {
    let tokens = lex("5 5.5").expect("lexes");
    assert_eq!(tokens[0].kind, TokenKind::Int(5));
    assert_eq!(tokens[1].kind, TokenKind::Float(5.5));
}
