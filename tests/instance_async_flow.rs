mod common;

use axum::http::StatusCode;
use serde_json::Value;

use common::{
    assert_problem, broker_app, empty_request, json_request, provision_body, request_json,
    update_body,
};

const ID: &str = "deleteme";

fn instance_uri(query: &str) -> String {
    format!("/v2/service_instances/{ID}{query}")
}

fn poll_uri() -> String {
    format!("/v2/service_instances/{ID}/last_operation?service_id=hello-service&plan_id=standard")
}

#[tokio::test]
async fn async_lifecycle_happy_path() {
    let app = broker_app(true);

    let (status, created) = request_json(
        app.clone(),
        json_request(
            "PUT",
            instance_uri("?accepts_incomplete=true"),
            &provision_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(created.get("async").and_then(Value::as_bool), Some(true));

    let (status, polled) = request_json(app.clone(), empty_request("GET", poll_uri())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled.get("state").and_then(Value::as_str), Some("succeeded"));
    assert_eq!(
        polled.get("delete_operation").and_then(Value::as_bool),
        Some(false)
    );

    let (status, updated) = request_json(
        app.clone(),
        json_request(
            "PATCH",
            instance_uri("?accepts_incomplete=true"),
            &update_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(updated.get("async").and_then(Value::as_bool), Some(true));

    let (status, polled) = request_json(app.clone(), empty_request("GET", poll_uri())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled.get("state").and_then(Value::as_str), Some("succeeded"));

    let (status, deleted) = request_json(
        app.clone(),
        empty_request(
            "DELETE",
            instance_uri("?service_id=hello-service&plan_id=standard&accepts_incomplete=true"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(deleted.get("async").and_then(Value::as_bool), Some(true));

    // The poll that discovers the finished delete reports success once.
    let (status, polled) = request_json(app.clone(), empty_request("GET", poll_uri())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled.get("state").and_then(Value::as_str), Some("succeeded"));
    assert_eq!(
        polled.get("delete_operation").and_then(Value::as_bool),
        Some(true)
    );

    let (status, problem) = request_json(app.clone(), empty_request("GET", poll_uri())).await;
    assert_eq!(status, StatusCode::GONE);
    assert_problem(&problem, 410, "Gone");

    let (status, problem) = request_json(
        app,
        json_request(
            "PATCH",
            instance_uri("?accepts_incomplete=true"),
            &update_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_problem(&problem, 404, "Not found");
}

#[tokio::test]
async fn create_is_refused_without_async_opt_in() {
    let app = broker_app(true);

    let (status, problem) = request_json(
        app.clone(),
        json_request(
            "PUT",
            instance_uri("?accepts_incomplete=false"),
            &provision_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_problem(&problem, 422, "Asynchronous operation required");

    let (status, problem) =
        request_json(app.clone(), json_request("PUT", instance_uri(""), &provision_body())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_problem(&problem, 422, "Asynchronous operation required");

    // Nothing was created by the refused requests.
    let (status, _problem) = request_json(app, empty_request("GET", poll_uri())).await;
    assert_eq!(status, StatusCode::GONE);
}

#[tokio::test]
async fn mutations_during_in_progress_operation_are_conflicts() {
    let app = broker_app(true);

    let (status, _created) = request_json(
        app.clone(),
        json_request(
            "PUT",
            instance_uri("?accepts_incomplete=true"),
            &provision_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, problem) = request_json(
        app.clone(),
        json_request(
            "PATCH",
            instance_uri("?accepts_incomplete=true"),
            &update_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_problem(&problem, 500, "Operation in progress");

    let (status, problem) = request_json(
        app.clone(),
        empty_request(
            "DELETE",
            instance_uri("?service_id=hello-service&plan_id=standard&accepts_incomplete=true"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_problem(&problem, 500, "Operation in progress");

    // Once the operation completes the same mutation goes through.
    let (status, polled) = request_json(app.clone(), empty_request("GET", poll_uri())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(polled.get("state").and_then(Value::as_str), Some("succeeded"));

    let (status, _updated) = request_json(
        app,
        json_request(
            "PATCH",
            instance_uri("?accepts_incomplete=true"),
            &update_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn duplicate_create_conflicts() {
    let app = broker_app(true);

    let (status, _created) = request_json(
        app.clone(),
        json_request(
            "PUT",
            instance_uri("?accepts_incomplete=true"),
            &provision_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, problem) = request_json(
        app,
        json_request(
            "PUT",
            instance_uri("?accepts_incomplete=true"),
            &provision_body(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_problem(&problem, 409, "Conflict");
}
