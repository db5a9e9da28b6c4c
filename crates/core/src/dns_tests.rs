// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn accepts_valid_labels() {
    assert!(is_dns_label("abc"));
    assert!(is_dns_label("a-b-c"));
    assert!(is_dns_label("a1"));
}

#[test]
fn rejects_invalid_labels() {
    assert!(!is_dns_label(""));
    assert!(!is_dns_label("-abc"));
    assert!(!is_dns_label("abc-"));
    assert!(!is_dns_label("Abc"));
    assert!(!is_dns_label("abc_def"));
    assert!(!is_dns_label(&"a".repeat(64)));
}
