// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn scope(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> std::rc::Rc<Scope> {
    Scope::root(Value::map_from(
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)),
    ))
}

#[test]
fn renders_dotted_path() {
    let s = scope([("clusterId", Value::string("abc"))]);
    assert_eq!(render("/clusters/{{ .clusterId }}", &s).unwrap(), "/clusters/abc");
}

#[test]
fn missing_variable_without_default_is_an_error() {
    let s = scope([]);
    let err = render("{{ .missing }}", &s).unwrap_err();
    assert_eq!(err, RenderError::MissingVariable("missing".to_string()));
}

#[test]
fn default_filter_supplies_a_fallback() {
    let s = scope([]);
    assert_eq!(
        render(r#"{{ .missing | default "fallback" }}"#, &s).unwrap(),
        "fallback"
    );
}

#[test]
fn lower_and_upper_filters() {
    let s = scope([("name", Value::string("AbC"))]);
    assert_eq!(render("{{ .name | lower }}", &s).unwrap(), "abc");
    assert_eq!(render("{{ .name | upper }}", &s).unwrap(), "ABC");
}

#[test]
fn date_filter_formats_unix_epoch_seconds() {
    let s = scope([("ts", Value::Int(0))]);
    assert_eq!(
        render(r#"{{ .ts | date "2006-01-02 15:04:05" }}"#, &s).unwrap(),
        "1970-01-01 00:00:00"
    );
}

#[test]
fn unknown_filter_is_rejected() {
    let s = scope([("name", Value::string("x"))]);
    let err = render("{{ .name | reverse }}", &s).unwrap_err();
    assert_eq!(err, RenderError::UnknownFilter("reverse".to_string()));
}
