#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use hello_broker::{
    application::{binding_service::BindingService, instance_service::InstanceService},
    build_router,
    infrastructure::{
        hello_service::HelloService, in_memory_binding_repository::InMemoryBindingRepository,
        in_memory_instance_repository::InMemoryInstanceRepository,
    },
    state::AppState,
};

pub fn broker_app(async_backend: bool) -> Router {
    let instances = Arc::new(InMemoryInstanceRepository::new());
    let bindings = Arc::new(InMemoryBindingRepository::new());
    let backend = Arc::new(HelloService::new(async_backend));

    let instance_service = Arc::new(InstanceService::new(instances.clone(), backend));
    let binding_service = Arc::new(BindingService::new(instances, bindings));

    build_router(AppState::new(instance_service, binding_service))
}

pub fn provision_body() -> Value {
    json!({
        "service_id": "hello-service",
        "plan_id": "standard",
        "organization_guid": "org-guid",
        "space_guid": "space-guid",
        "parameters": { "foo": "bar" }
    })
}

pub fn update_body() -> Value {
    json!({
        "service_id": "hello-service",
        "plan_id": "standard",
        "parameters": { "bizz": "bazz" }
    })
}

pub fn bind_body() -> Value {
    json!({
        "service_id": "hello-service",
        "plan_id": "standard",
        "bind_resource": { "app_guid": "app-guid" },
        "parameters": {}
    })
}

pub async fn request_json(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .oneshot(request)
        .await
        .expect("router should serve request");

    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();

    if body.is_empty() {
        return (status, Value::Null);
    }

    let value = serde_json::from_slice(&body).expect("body should be valid json");
    (status, value)
}

pub fn json_request(method: &str, uri: impl AsRef<str>, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri.as_ref())
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn empty_request(method: &str, uri: impl AsRef<str>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri.as_ref())
        .body(Body::empty())
        .expect("valid request")
}

pub fn assert_problem(problem: &Value, expected_status: u16, expected_title: &str) {
    assert_eq!(
        problem.get("status").and_then(Value::as_u64),
        Some(u64::from(expected_status))
    );
    assert_eq!(
        problem.get("title").and_then(Value::as_str),
        Some(expected_title)
    );
    assert!(problem.get("detail").and_then(Value::as_str).is_some());
    assert!(
        problem
            .get("correlation_id")
            .and_then(Value::as_str)
            .is_some()
    );
    assert!(problem.get("type").and_then(Value::as_str).is_some());
}
