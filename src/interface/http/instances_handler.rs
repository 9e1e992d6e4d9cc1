use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    application::dto::{
        CreateServiceInstanceRequest, HealthResponse, LastOperationResponse,
        ServiceInstanceResponse, UpdateServiceInstanceRequest,
    },
    domain::instance::ServiceInstance,
    interface::http::problem::{ApiProblem, ApiResult},
    state::AppState,
};

/// `accepts_incomplete` query flag; absent means the caller insists on a
/// synchronous answer.
#[derive(Debug, Deserialize)]
pub struct AsyncFlag {
    #[serde(default)]
    pub accepts_incomplete: bool,
}

pub async fn healthcheck() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn create_instance(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Query(flag): Query<AsyncFlag>,
    Json(request): Json<CreateServiceInstanceRequest>,
) -> ApiResult<(StatusCode, Json<ServiceInstanceResponse>)> {
    let instance = state
        .instance_service
        .create_instance(&instance_id, request, flag.accepts_incomplete)
        .await
        .map_err(ApiProblem::from_broker)?;

    Ok((
        accepted_status(&instance, StatusCode::CREATED),
        Json(ServiceInstanceResponse::from(&instance)),
    ))
}

pub async fn update_instance(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Query(flag): Query<AsyncFlag>,
    Json(request): Json<UpdateServiceInstanceRequest>,
) -> ApiResult<(StatusCode, Json<ServiceInstanceResponse>)> {
    let instance = state
        .instance_service
        .update_instance(&instance_id, request, flag.accepts_incomplete)
        .await
        .map_err(ApiProblem::from_broker)?;

    Ok((
        accepted_status(&instance, StatusCode::OK),
        Json(ServiceInstanceResponse::from(&instance)),
    ))
}

pub async fn delete_instance(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    Query(flag): Query<AsyncFlag>,
) -> ApiResult<(StatusCode, Json<ServiceInstanceResponse>)> {
    let instance = state
        .instance_service
        .delete_instance(&instance_id, flag.accepts_incomplete)
        .await
        .map_err(ApiProblem::from_broker)?;

    Ok((
        accepted_status(&instance, StatusCode::OK),
        Json(ServiceInstanceResponse::from(&instance)),
    ))
}

pub async fn last_operation(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
) -> ApiResult<Json<LastOperationResponse>> {
    let response = state
        .instance_service
        .last_operation(&instance_id)
        .await
        .map_err(ApiProblem::from_broker)?;
    Ok(Json(response))
}

/// 202 while the recorded operation is still running, the terminal status
/// otherwise.
fn accepted_status(instance: &ServiceInstance, completed: StatusCode) -> StatusCode {
    if instance.in_progress() {
        StatusCode::ACCEPTED
    } else {
        completed
    }
}
