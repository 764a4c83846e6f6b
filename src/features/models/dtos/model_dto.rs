use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::models::models::ModelRecord;

/// Upload model request for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler streams axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadModelDto {
    /// The GLB/GLTF file to upload
    #[schema(format = Binary, content_media_type = "model/gltf-binary")]
    pub file: String,
    /// Display title, defaults to the filename without extension
    #[schema(example = "Oak Chair")]
    pub title: Option<String>,
    /// Optional free text description
    pub description: Option<String>,
}

/// Response for a successful upload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadModelResponseDto {
    pub success: bool,
    /// Identifier assigned by the database
    pub id: Uuid,
    /// Public page where the model can be viewed
    pub view_url: String,
    /// Direct URL of the stored file
    pub direct_url: String,
    pub title: String,
    /// Size in bytes as reported by storage
    pub file_size: i64,
    pub message: String,
}

/// Full model record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub storage_url: String,
    pub storage_id: String,
    pub file_size: i64,
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ModelRecord> for ModelResponseDto {
    fn from(m: ModelRecord) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            filename: m.filename,
            storage_url: m.storage_url,
            storage_id: m.storage_id,
            file_size: m.file_size,
            metadata: m.metadata,
            view_count: m.view_count,
            created_at: m.created_at,
        }
    }
}

/// Content type for binary glTF (GLB) files
pub const GLB_CONTENT_TYPE: &str = "model/gltf-binary";

/// Content type for JSON glTF files
pub const GLTF_CONTENT_TYPE: &str = "model/gltf+json";

/// Pick the content type recorded in model metadata.
///
/// The client's declared type wins unless it is missing or the generic
/// `application/octet-stream`, in which case it is inferred from the extension.
pub fn resolve_content_type(declared: Option<&str>, extension: &str) -> String {
    match declared {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => match extension {
            "gltf" => GLTF_CONTENT_TYPE.to_string(),
            "glb" => GLB_CONTENT_TYPE.to_string(),
            _ => "application/octet-stream".to_string(),
        },
    }
}
