use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::upload_config::dtos::{
    PublicConfigDto, SignUploadRequestDto, SignedUploadDto,
};
use crate::features::upload_config::services::UploadConfigService;
use crate::shared::types::ErrorResponse;

/// Get public upload settings
#[utoipa::path(
    get,
    path = "/config",
    tag = "config",
    responses(
        (status = 200, description = "Upload settings", body = PublicConfigDto)
    )
)]
pub async fn get_config(State(service): State<Arc<UploadConfigService>>) -> Json<PublicConfigDto> {
    Json(service.public_config())
}

/// Sign a direct upload
///
/// Returns the parameters the browser must send to the storage provider,
/// signed with the server-held API secret.
#[utoipa::path(
    post,
    path = "/config",
    tag = "config",
    request_body = SignUploadRequestDto,
    responses(
        (status = 200, description = "Signed upload parameters", body = SignedUploadDto),
        (status = 400, description = "Invalid upload type or filename", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse)
    )
)]
pub async fn sign_upload(
    State(service): State<Arc<UploadConfigService>>,
    AppJson(dto): AppJson<SignUploadRequestDto>,
) -> Result<Json<SignedUploadDto>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let signed = service.sign_upload(dto, Utc::now())?;
    Ok(Json(signed))
}
