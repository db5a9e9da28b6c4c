// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use indexmap::IndexMap;
use reconadapter_core::EventData;
use reconadapter_recipe::{Metadata, ParamInput, ParamType};
use reconadapter_transport::{ApiResponse, FakeApiClient, FakeConfigMapStore, FakeSecretStore, FakeTransport};

fn ctx() -> ExecutionContext {
    ExecutionContext::new(
        &Metadata { name: "abc".to_string(), labels: IndexMap::new() },
        EventData::new(Value::map_from([("id".to_string(), Value::string("abc"))])),
    )
}

fn executor<'a>(
    transport: &'a FakeTransport,
    api_client: &'a FakeApiClient,
    secrets: &'a FakeSecretStore,
    configmaps: &'a FakeConfigMapStore,
) -> StepExecutor<'a> {
    StepExecutor { transport, api_client, secrets, configmaps, default_namespace: Some("default") }
}

#[tokio::test]
async fn when_false_skips_the_step() {
    let transport = FakeTransport::new();
    let api_client = FakeApiClient::new();
    let secrets = FakeSecretStore::new();
    let configmaps = FakeConfigMapStore::new();
    let exec = executor(&transport, &api_client, &secrets, &configmaps);
    let mut c = ctx();
    let step = Step {
        name: "gate".to_string(),
        when: Some("false".to_string()),
        kind: StepKind::Log(LogStep { level: LogLevel::Info, message: "unreachable".to_string() }),
    };
    exec.run_step(&step, &mut c).await;
    let result = c.finish();
    assert!(result.step_results[0].skipped);
}

#[tokio::test]
async fn param_step_binds_value_into_variables() {
    let transport = FakeTransport::new();
    let api_client = FakeApiClient::new();
    let secrets = FakeSecretStore::new();
    let configmaps = FakeConfigMapStore::new();
    let exec = executor(&transport, &api_client, &secrets, &configmaps);
    let mut c = ctx();
    let step = Step {
        name: "greeting".to_string(),
        when: None,
        kind: StepKind::Param(ParamStep {
            input: ParamInput::Value(Value::string("hello")),
            default: None,
            ty: Some(ParamType::String),
        }),
    };
    exec.run_step(&step, &mut c).await;
    assert_eq!(c.get_variable("greeting"), Some(&Value::string("hello")));
}

#[tokio::test]
async fn api_call_step_captures_response_fields() {
    let transport = FakeTransport::new();
    let api_client = FakeApiClient::new();
    api_client.push_response(ApiResponse {
        status: 200,
        headers: IndexMap::new(),
        body: Some(Value::map_from([("ready".to_string(), Value::string("True"))])),
    });
    let secrets = FakeSecretStore::new();
    let configmaps = FakeConfigMapStore::new();
    let exec = executor(&transport, &api_client, &secrets, &configmaps);
    let mut c = ctx();
    let step = Step {
        name: "status".to_string(),
        when: None,
        kind: StepKind::ApiCall(ApiCallStep {
            method: RecipeHttpMethod::Get,
            url: "https://example/status".to_string(),
            timeout_seconds: None,
            retry_attempts: None,
            retry_backoff: None,
            headers: IndexMap::new(),
            body: None,
            capture: vec![reconadapter_recipe::Capture {
                name: "ready".to_string(),
                field: Some("ready".to_string()),
                expression: None,
            }],
        }),
    };
    exec.run_step(&step, &mut c).await;
    assert_eq!(c.get_variable("ready"), Some(&Value::string("True")));
}
