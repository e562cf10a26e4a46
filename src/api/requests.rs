//! Maintenance request endpoints

use axum::{extract::State, http::StatusCode};

use crate::{
    api::extract::{Json, Path, Query},
    error::AppResult,
    models::request::{CreateRequest, MaintenanceRequest, RequestQuery, UpdateStage},
    AppState,
};

/// List maintenance requests
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(RequestQuery),
    responses(
        (status = 200, description = "Requests, newest first", body = Vec<MaintenanceRequest>)
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<RequestQuery>,
) -> AppResult<Json<Vec<MaintenanceRequest>>> {
    let requests = state.services.requests.list(&query).await?;
    Ok(Json(requests))
}

/// Get request by ID
#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = MaintenanceRequest),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<MaintenanceRequest>> {
    let request = state.services.requests.get_by_id(id).await?;
    Ok(Json(request))
}

/// Create a maintenance request.
///
/// Team and technician default to the equipment's assignment.
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    request_body = CreateRequest,
    responses(
        (status = 201, description = "Request created", body = MaintenanceRequest),
        (status = 400, description = "Missing scheduled date or technician outside team", body = crate::error::ErrorResponse),
        (status = 404, description = "Equipment, team or technician not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Equipment is scrapped", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    Json(data): Json<CreateRequest>,
) -> AppResult<(StatusCode, Json<MaintenanceRequest>)> {
    let request = state.services.requests.create(&data).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Move a request to another stage; `scrap` also scraps the equipment
#[utoipa::path(
    put,
    path = "/requests/{id}/stage",
    tag = "requests",
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateStage,
    responses(
        (status = 200, description = "Request updated", body = MaintenanceRequest),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_stage(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(data): Json<UpdateStage>,
) -> AppResult<Json<MaintenanceRequest>> {
    let request = state.services.requests.transition_stage(id, data.stage).await?;
    Ok(Json(request))
}
