use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use tracing::debug;

use crate::core::config::UploadConfig;
use crate::core::error::AppError;
use crate::features::models::dtos::{UploadModelDto, UploadModelResponseDto};
use crate::features::models::handlers::ModelsState;
use crate::features::models::services::ModelUpload;
use crate::shared::spool::{SpoolError, SpooledFile};
use crate::shared::types::ErrorResponse;
use crate::shared::validation::has_allowed_extension;

/// A file part that passed validation and sits in a temp file
struct ReceivedFile {
    filename: String,
    content_type: Option<String>,
    spool: SpooledFile,
}

fn too_large(limit: usize) -> AppError {
    AppError::BadRequest(format!(
        "File too large. Maximum size is {} bytes ({} MB)",
        limit,
        limit / 1024 / 1024
    ))
}

/// Reject names outside the allow-list before any bytes are read
fn validate_filename(filename: &str, limits: &UploadConfig) -> Result<(), AppError> {
    if has_allowed_extension(filename, &limits.allowed_extensions) {
        return Ok(());
    }

    let allowed = limits
        .allowed_extensions
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(", ");

    Err(AppError::BadRequest(format!(
        "Invalid file type '{}'. Allowed formats: {}",
        filename, allowed
    )))
}

/// Stream a file part into a spool, enforcing the size ceiling as it goes
async fn receive_file(
    mut field: Field<'_>,
    filename: String,
    limits: &UploadConfig,
) -> Result<ReceivedFile, AppError> {
    let content_type = field.content_type().map(|s| s.to_string());

    let mut spool = SpooledFile::create(limits.temp_dir.as_ref(), limits.max_file_size)
        .map_err(|e| AppError::Internal(format!("Failed to create upload spool: {}", e)))?;

    while let Some(chunk) = field.chunk().await.map_err(|e| {
        debug!("Failed to read file bytes: {}", e);
        AppError::BadRequest(format!("Failed to read file data: {}", e))
    })? {
        spool.write_chunk(&chunk).await.map_err(|e| match e {
            SpoolError::TooLarge { limit } => too_large(limit),
            SpoolError::Io(e) => AppError::Internal(format!("Failed to spool upload: {}", e)),
        })?;
    }

    debug!(
        "Received '{}' ({} bytes) at {}",
        filename,
        spool.len(),
        spool.path().display()
    );

    Ok(ReceivedFile {
        filename,
        content_type,
        spool,
    })
}

/// Upload a 3D model
///
/// Accepts multipart/form-data with:
/// - `file`: the `.glb` or `.gltf` file (required, at most 100 MiB by default)
/// - `title`: display title (optional, defaults to the filename without extension)
/// - `description`: free text (optional)
#[utoipa::path(
    post,
    path = "/upload",
    tag = "models",
    request_body(
        content = UploadModelDto,
        content_type = "multipart/form-data",
        description = "Model file with optional title and description",
    ),
    responses(
        (status = 200, description = "Model uploaded", body = UploadModelResponseDto),
        (status = 400, description = "Missing file, wrong format or file too large", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
pub async fn upload_model(
    State(state): State<ModelsState>,
    mut multipart: Multipart,
) -> Result<Json<UploadModelResponseDto>, AppError> {
    let limits = state.upload_service.limits();

    let mut file: Option<ReceivedFile> = None;
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                // A `file` part without a filename is a plain text field, not an upload
                let Some(filename) = field.file_name().map(|s| s.to_string()) else {
                    debug!("Ignoring `file` field without a filename");
                    continue;
                };

                validate_filename(&filename, limits)?;
                file = Some(receive_file(field, filename, limits).await?);
            }
            "title" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read title field: {}", e))
                })?;
                title = Some(text);
            }
            "description" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read description field: {}", e))
                })?;
                description = Some(text);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let mut file = file.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    if file.spool.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }

    let data = file
        .spool
        .read_all()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read spooled upload: {}", e)))?;

    let response = state
        .upload_service
        .upload(ModelUpload {
            data,
            filename: file.filename,
            content_type: file.content_type,
            title,
            description,
        })
        .await?;

    Ok(Json(response))
}
