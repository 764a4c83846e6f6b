use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Public storage settings, safe to hand to any client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfigDto {
    pub cloud_name: String,
    pub api_key: String,
    /// Endpoint for raw (model) uploads
    pub upload_url: String,
    /// Largest accepted model file, in bytes
    pub max_file_size: usize,
    /// Accepted model extensions, without the dot
    pub allowed_formats: Vec<String>,
}

/// Request to sign a direct upload
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUploadRequestDto {
    /// `model` (default) or `thumbnail`
    #[schema(example = "model")]
    pub upload_type: Option<String>,

    /// Name of the file the client is about to upload
    #[validate(length(min = 1, max = 255, message = "Filename must be 1-255 characters"))]
    #[schema(example = "oak-chair.glb")]
    pub filename: String,
}

/// Signed parameters for a direct upload
///
/// The client sends `params` unchanged along with `signature`, `timestamp`
/// and `apiKey` to `uploadUrl`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedUploadDto {
    pub signature: String,
    /// Unix seconds the signature was issued at
    pub timestamp: i64,
    pub api_key: String,
    pub cloud_name: String,
    pub upload_url: String,
    pub params: BTreeMap<String, String>,
}
