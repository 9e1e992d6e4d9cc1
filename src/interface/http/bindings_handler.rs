use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    application::dto::{CreateServiceBindingRequest, ServiceBindingResponse},
    interface::http::problem::{ApiProblem, ApiResult},
    state::AppState,
};

pub async fn create_binding(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
    Json(request): Json<CreateServiceBindingRequest>,
) -> ApiResult<(StatusCode, Json<ServiceBindingResponse>)> {
    let binding = state
        .binding_service
        .create_binding(&instance_id, &binding_id, request)
        .await
        .map_err(ApiProblem::from_broker)?;

    Ok((
        StatusCode::CREATED,
        Json(ServiceBindingResponse {
            credentials: binding.credentials,
        }),
    ))
}

pub async fn delete_binding(
    State(state): State<AppState>,
    Path((instance_id, binding_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .binding_service
        .delete_binding(&instance_id, &binding_id)
        .await
        .map_err(ApiProblem::from_broker)?;

    Ok(StatusCode::OK)
}
