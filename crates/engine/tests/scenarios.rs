// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios (spec.md §8 S1-S6).
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use indexmap::IndexMap;
use reconadapter_core::{EventData, Value};
use reconadapter_engine::{ExecutionResult, Orchestrator, ResultStatus};
use reconadapter_recipe::{
    ApiCallStep, BackoffKind, Capture, Discovery, HttpMethod, LogLevel, LogStep, ManifestSource, Metadata,
    NestedDiscovery, ParamInput, ParamStep, PayloadStep, Recipe, ResourceStep, Spec, Step, StepKind,
};
use reconadapter_transport::{
    ApiResponse, FakeApiClient, FakeConfigMapStore, FakeSecretStore, FakeTransport, Operation, TransportCall,
};
use tokio_util::sync::CancellationToken;

fn recipe(steps: Vec<Step>) -> Recipe {
    Recipe {
        metadata: Metadata { name: "test-adapter".to_string(), labels: IndexMap::new() },
        spec: Spec { adapter: Default::default(), clients: IndexMap::new(), steps },
    }
}

fn namespace_manifest(name: &str, generation: i64) -> Value {
    Value::map_from([
        ("apiVersion".to_string(), Value::string("v1")),
        ("kind".to_string(), Value::string("Namespace")),
        (
            "metadata".to_string(),
            Value::map_from([
                ("name".to_string(), Value::string(name)),
                (
                    "annotations".to_string(),
                    Value::map_from([(
                        reconadapter_recipe::GENERATION_ANNOTATION_KEY.to_string(),
                        Value::Int(generation),
                    )]),
                ),
            ]),
        ),
    ])
}

async fn run(
    r: &Recipe,
    event: Value,
    transport: &FakeTransport,
    api_client: &FakeApiClient,
) -> ExecutionResult {
    let secrets = FakeSecretStore::new();
    let configmaps = FakeConfigMapStore::new();
    let orchestrator = Orchestrator {
        transport,
        api_client,
        secrets: &secrets,
        configmaps: &configmaps,
        default_namespace: Some("default"),
    };
    orchestrator
        .handle_event(r, EventData::new(event), CancellationToken::new())
        .await
        .unwrap()
}

#[tokio::test]
async fn s1_happy_path() {
    let steps = vec![
        Step {
            name: "clusterId".to_string(),
            when: None,
            kind: StepKind::Param(ParamStep {
                input: ParamInput::Source("event.id".to_string()),
                default: None,
                ty: None,
            }),
        },
        Step {
            name: "clusterStatus".to_string(),
            when: None,
            kind: StepKind::ApiCall(ApiCallStep {
                method: HttpMethod::Get,
                url: "/clusters/{{ .clusterId }}".to_string(),
                timeout_seconds: None,
                retry_attempts: None,
                retry_backoff: None,
                headers: IndexMap::new(),
                body: None,
                capture: vec![Capture {
                    name: "ready".to_string(),
                    field: None,
                    expression: Some(r#"status.conditions.filter(c,c.type=="Ready")[0].status"#.to_string()),
                }],
            }),
        },
        Step {
            name: "ns0".to_string(),
            when: None,
            kind: StepKind::Resource(ResourceStep {
                manifest: ManifestSource::Inline(namespace_manifest("abc", 5)),
                discovery: Discovery::ByName("abc".to_string()),
                nested_discoveries: vec![],
                recreate_on_change: false,
            }),
        },
        Step {
            name: "payload".to_string(),
            when: None,
            kind: StepKind::Payload(PayloadStep {
                tree: Value::map_from([(
                    "observed_generation".to_string(),
                    Value::map_from([("expression".to_string(), Value::string("generation"))]),
                )]),
            }),
        },
        Step {
            name: "reportStatus".to_string(),
            when: None,
            kind: StepKind::ApiCall(ApiCallStep {
                method: HttpMethod::Post,
                url: "/clusters/abc/statuses".to_string(),
                timeout_seconds: None,
                retry_attempts: None,
                retry_backoff: None,
                headers: IndexMap::new(),
                body: Some(Value::map_from([(
                    "observed_generation".to_string(),
                    Value::map_from([("expression".to_string(), Value::string("generation"))]),
                )])),
                capture: vec![],
            }),
        },
    ];
    let r = recipe(steps);
    let transport = FakeTransport::new();
    let api_client = FakeApiClient::new();
    api_client.push_response(ApiResponse {
        status: 200,
        headers: IndexMap::new(),
        body: Some(Value::map_from([(
            "status".to_string(),
            Value::map_from([(
                "conditions".to_string(),
                Value::List(vec![Value::map_from([
                    ("type".to_string(), Value::string("Ready")),
                    ("status".to_string(), Value::string("True")),
                ])]),
            )]),
        )])),
    });
    api_client.push_response(ApiResponse { status: 200, headers: IndexMap::new(), body: None });

    let event = Value::map_from([("id".to_string(), Value::string("abc")), ("generation".to_string(), Value::Int(5))]);
    let result = run(&r, event, &transport, &api_client).await;

    assert_eq!(result.status, ResultStatus::Success);
    assert_eq!(result.step_results.len(), 5);
    assert!(result.step_results.iter().all(|s| s.error.is_none() && !s.skipped));

    let post = &api_client.requests()[1];
    let body = post.body.as_ref().unwrap();
    assert_eq!(body.get_path("observed_generation"), Some(&Value::Int(5)));
    let json = serde_json::to_string(body).unwrap();
    assert!(json.contains("\"observed_generation\":5"));
}

#[tokio::test]
async fn s2_skip_when_preconditions_unmet() {
    let steps = vec![
        Step {
            name: "statusCall".to_string(),
            when: None,
            kind: StepKind::ApiCall(ApiCallStep {
                method: HttpMethod::Get,
                url: "/clusters/abc".to_string(),
                timeout_seconds: None,
                retry_attempts: None,
                retry_backoff: None,
                headers: IndexMap::new(),
                body: None,
                capture: vec![Capture { name: "ready".to_string(), field: Some("ready".to_string()), expression: None }],
            }),
        },
        Step {
            name: "gate".to_string(),
            when: None,
            kind: StepKind::Param(ParamStep {
                input: ParamInput::Expression("ready == \"True\"".to_string()),
                default: Some(Value::Bool(false)),
                ty: None,
            }),
        },
        Step {
            name: "ns0".to_string(),
            when: Some("ready == \"True\"".to_string()),
            kind: StepKind::Resource(ResourceStep {
                manifest: ManifestSource::Inline(namespace_manifest("abc", 5)),
                discovery: Discovery::ByName("abc".to_string()),
                nested_discoveries: vec![],
                recreate_on_change: false,
            }),
        },
        Step {
            name: "reportStatus".to_string(),
            when: None,
            kind: StepKind::ApiCall(ApiCallStep {
                method: HttpMethod::Post,
                url: "/clusters/abc/statuses".to_string(),
                timeout_seconds: None,
                retry_attempts: None,
                retry_backoff: None,
                headers: IndexMap::new(),
                body: None,
                capture: vec![],
            }),
        },
    ];
    let r = recipe(steps);
    let transport = FakeTransport::new();
    let api_client = FakeApiClient::new();
    api_client.push_response(ApiResponse {
        status: 200,
        headers: IndexMap::new(),
        body: Some(Value::map_from([("ready".to_string(), Value::string("False"))])),
    });
    api_client.push_response(ApiResponse { status: 200, headers: IndexMap::new(), body: None });

    let event = Value::map_from([("id".to_string(), Value::string("abc"))]);
    let result = run(&r, event, &transport, &api_client).await;

    assert_eq!(result.step_results[2].skipped, true);
    assert_eq!(result.step_results[3].skipped, false);
    assert_eq!(api_client.requests().len(), 2);
}

#[tokio::test]
async fn s3_generation_based_skip() {
    let r = recipe(vec![Step {
        name: "ns0".to_string(),
        when: None,
        kind: StepKind::Resource(ResourceStep {
            manifest: ManifestSource::Inline(namespace_manifest("abc", 5)),
            discovery: Discovery::ByName("abc".to_string()),
            nested_discoveries: vec![],
            recreate_on_change: false,
        }),
    }]);
    let transport = FakeTransport::new();
    transport.seed(namespace_manifest("abc", 5));
    let api_client = FakeApiClient::new();

    let event = Value::map_from([("id".to_string(), Value::string("abc"))]);
    let result = run(&r, event, &transport, &api_client).await;

    assert_eq!(result.step_results[0].error, None);
    let applies: Vec<_> = transport
        .calls()
        .into_iter()
        .filter(|c| matches!(c, TransportCall::Apply { .. }))
        .collect();
    assert_eq!(applies.len(), 0, "skip must not issue an update call");
    let discovers: Vec<_> = transport
        .calls()
        .into_iter()
        .filter(|c| matches!(c, TransportCall::Get { .. }))
        .collect();
    assert_eq!(discovers.len(), 2); // lifecycle get + discovery get
}

#[tokio::test]
async fn s4_recreate_on_change() {
    let r = recipe(vec![Step {
        name: "ns0".to_string(),
        when: None,
        kind: StepKind::Resource(ResourceStep {
            manifest: ManifestSource::Inline(namespace_manifest("abc", 6)),
            discovery: Discovery::ByName("abc".to_string()),
            nested_discoveries: vec![],
            recreate_on_change: true,
        }),
    }]);
    let transport = FakeTransport::new();
    transport.seed(namespace_manifest("abc", 5));
    let api_client = FakeApiClient::new();

    let event = Value::map_from([("id".to_string(), Value::string("abc"))]);
    let result = run(&r, event, &transport, &api_client).await;

    assert_eq!(result.step_results[0].error, None);
    assert_eq!(transport.objects().len(), 1);
    let generation = transport.objects()[0]
        .get_path("metadata.annotations")
        .and_then(Value::as_map)
        .and_then(|m| m.get(reconadapter_recipe::GENERATION_ANNOTATION_KEY));
    assert_eq!(generation, Some(&Value::Int(6)));

    let applied = transport
        .calls()
        .into_iter()
        .find_map(|call| match call {
            TransportCall::Apply { operation, .. } => Some(operation),
            _ => None,
        });
    assert_eq!(applied, Some(Operation::Recreate));
}

#[tokio::test]
async fn s5_first_error_sticky() {
    let steps = vec![
        Step {
            name: "step1".to_string(),
            when: None,
            kind: StepKind::Param(ParamStep { input: ParamInput::Value(Value::Int(1)), default: None, ty: None }),
        },
        Step {
            name: "step2".to_string(),
            when: None,
            kind: StepKind::ApiCall(ApiCallStep {
                method: HttpMethod::Get,
                url: "/boom".to_string(),
                timeout_seconds: None,
                retry_attempts: None,
                retry_backoff: None,
                headers: IndexMap::new(),
                body: None,
                capture: vec![],
            }),
        },
        Step {
            name: "step3".to_string(),
            when: None,
            kind: StepKind::Param(ParamStep {
                input: ParamInput::Expression("1 / 0".to_string()),
                default: None,
                ty: None,
            }),
        },
        Step {
            name: "step4".to_string(),
            when: None,
            kind: StepKind::Log(LogStep { level: LogLevel::Info, message: "done".to_string() }),
        },
    ];
    let r = recipe(steps);
    let transport = FakeTransport::new();
    let api_client = FakeApiClient::new();
    api_client.push_response(ApiResponse { status: 500, headers: IndexMap::new(), body: None });

    let event = Value::map_from([("id".to_string(), Value::string("abc"))]);
    let result = run(&r, event, &transport, &api_client).await;

    assert_eq!(result.status, ResultStatus::Failed);
    assert_eq!(result.step_results.len(), 4);
    assert_eq!(result.errors.len(), 2);
}

#[tokio::test]
async fn s6_nested_discovery_promotion() {
    let envelope = Value::map_from([
        ("apiVersion".to_string(), Value::string("dispatch/v1")),
        ("kind".to_string(), Value::string("Envelope")),
        (
            "metadata".to_string(),
            Value::map_from([
                ("name".to_string(), Value::string("bundle")),
                (
                    "annotations".to_string(),
                    Value::map_from([(
                        reconadapter_recipe::GENERATION_ANNOTATION_KEY.to_string(),
                        Value::Int(1),
                    )]),
                ),
            ]),
        ),
        (
            "children".to_string(),
            Value::List(vec![namespace_manifest("abc", 1)]),
        ),
    ]);
    let r = recipe(vec![Step {
        name: "bundle".to_string(),
        when: None,
        kind: StepKind::Resource(ResourceStep {
            manifest: ManifestSource::Inline(envelope),
            discovery: Discovery::ByName("bundle".to_string()),
            nested_discoveries: vec![NestedDiscovery { name: "ns0".to_string(), discovery: Discovery::ByName("abc".to_string()) }],
            recreate_on_change: false,
        }),
    }]);
    let transport = FakeTransport::new();
    let api_client = FakeApiClient::new();

    let event = Value::map_from([("id".to_string(), Value::string("abc"))]);
    let result = run(&r, event, &transport, &api_client).await;

    assert_eq!(result.step_results[0].error, None);
    assert!(result.resources.contains_key("ns0"));
    assert_eq!(
        result.resources.get("ns0").and_then(|v| v.get_path("metadata.name")),
        Some(&Value::string("abc"))
    );
}
