// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use reconadapter_transport::{FakeConfigMapStore, FakeSecretStore};

fn scope(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Rc<Scope> {
    Scope::root(Value::map_from(pairs.into_iter().map(|(k, v)| (k.to_string(), v))))
}

fn env<'a>(secrets: &'a FakeSecretStore, configmaps: &'a FakeConfigMapStore) -> ParamEnv<'a> {
    ParamEnv { secrets, configmaps }
}

#[tokio::test]
async fn value_input_wins_over_everything_else() {
    let step = ParamStep { input: ParamInput::Value(Value::Int(9)), default: None, ty: None };
    let secrets = FakeSecretStore::default();
    let configmaps = FakeConfigMapStore::default();
    let result = resolve(&step, &scope([]), &env(&secrets, &configmaps)).await.unwrap();
    assert_eq!(result, Value::Int(9));
}

#[tokio::test]
async fn bare_source_is_event_relative() {
    let step = ParamStep { input: ParamInput::Source("id".to_string()), default: None, ty: None };
    let s = scope([("event", Value::map_from([("id".to_string(), Value::string("abc"))]))]);
    let secrets = FakeSecretStore::default();
    let configmaps = FakeConfigMapStore::default();
    let result = resolve(&step, &s, &env(&secrets, &configmaps)).await.unwrap();
    assert_eq!(result, Value::string("abc"));
}

#[tokio::test]
async fn missing_source_falls_back_to_default() {
    let step = ParamStep {
        input: ParamInput::Source("event.missing".to_string()),
        default: Some(Value::string("fallback")),
        ty: None,
    };
    let secrets = FakeSecretStore::default();
    let configmaps = FakeConfigMapStore::default();
    let result = resolve(&step, &scope([]), &env(&secrets, &configmaps)).await.unwrap();
    assert_eq!(result, Value::string("fallback"));
}

#[tokio::test]
async fn int_coercion_from_string() {
    let step = ParamStep {
        input: ParamInput::Value(Value::string("42")),
        default: None,
        ty: Some(ParamType::Int),
    };
    let secrets = FakeSecretStore::default();
    let configmaps = FakeConfigMapStore::default();
    let result = resolve(&step, &scope([]), &env(&secrets, &configmaps)).await.unwrap();
    assert_eq!(result, Value::Int(42));
}

#[tokio::test]
async fn secret_source_reads_through_the_store() {
    let secrets = FakeSecretStore::default();
    secrets.set("ns0", "db", "password", "hunter2");
    let configmaps = FakeConfigMapStore::default();
    let step = ParamStep {
        input: ParamInput::Source("secret.ns0.db.password".to_string()),
        default: None,
        ty: None,
    };
    let result = resolve(&step, &scope([]), &env(&secrets, &configmaps)).await.unwrap();
    assert_eq!(result, Value::string("hunter2"));
}
