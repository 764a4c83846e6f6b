use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::models::dtos::ModelResponseDto;
use crate::features::models::handlers::ModelsState;
use crate::shared::types::{ErrorResponse, SuccessResponse};

/// Record one view of a model
///
/// Every call increments the model's view count by exactly one.
#[utoipa::path(
    post,
    path = "/model/{id}/view",
    tag = "models",
    params(
        ("id" = String, Path, description = "Model ID")
    ),
    responses(
        (status = 200, description = "View recorded", body = SuccessResponse),
        (status = 400, description = "Missing model id", body = ErrorResponse),
        (status = 404, description = "Model not found", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn record_view(
    State(state): State<ModelsState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    state.view_service.record_view(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Get a model by id
#[utoipa::path(
    get,
    path = "/model/{id}",
    tag = "models",
    params(
        ("id" = String, Path, description = "Model ID")
    ),
    responses(
        (status = 200, description = "Model found", body = ModelResponseDto),
        (status = 404, description = "Model not found", body = ErrorResponse)
    )
)]
pub async fn get_model(
    State(state): State<ModelsState>,
    Path(id): Path<String>,
) -> Result<Json<ModelResponseDto>> {
    let model = state.view_service.get_model(&id).await?;
    Ok(Json(model))
}
