use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::config::{StorageConfig, UploadConfig};
use crate::core::error::{AppError, Result};
use crate::features::upload_config::dtos::{
    PublicConfigDto, SignUploadRequestDto, SignedUploadDto,
};
use crate::modules::storage::signature::sign_params;
use crate::modules::storage::ResourceType;
use crate::shared::validation::{file_stem, has_allowed_extension, sanitize_filename};

/// What a direct upload is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadKind {
    Model,
    Thumbnail,
}

impl UploadKind {
    fn parse(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim) {
            None | Some("") | Some("model") => Ok(Self::Model),
            Some("thumbnail") => Ok(Self::Thumbnail),
            Some(other) => Err(AppError::BadRequest(format!(
                "Invalid upload type '{}'. Expected 'model' or 'thumbnail'",
                other
            ))),
        }
    }

    fn resource_type(self) -> ResourceType {
        match self {
            Self::Model => ResourceType::Raw,
            Self::Thumbnail => ResourceType::Image,
        }
    }
}

/// Serves storage settings and signs direct uploads
pub struct UploadConfigService {
    storage: StorageConfig,
    upload: UploadConfig,
}

impl UploadConfigService {
    pub fn new(storage: StorageConfig, upload: UploadConfig) -> Self {
        Self { storage, upload }
    }

    pub fn public_config(&self) -> PublicConfigDto {
        PublicConfigDto {
            cloud_name: self.storage.cloud_name.clone(),
            api_key: self.storage.api_key.clone(),
            upload_url: self.storage.upload_url(ResourceType::Raw.as_str()),
            max_file_size: self.upload.max_file_size,
            allowed_formats: self.upload.allowed_extensions.clone(),
        }
    }

    /// Sign the parameters for one direct upload issued at `now`
    pub fn sign_upload(
        &self,
        dto: SignUploadRequestDto,
        now: DateTime<Utc>,
    ) -> Result<SignedUploadDto> {
        let kind = UploadKind::parse(dto.upload_type.as_deref())?;

        if kind == UploadKind::Model
            && !has_allowed_extension(&dto.filename, &self.upload.allowed_extensions)
        {
            return Err(AppError::BadRequest(format!(
                "Invalid file type '{}'. Only .glb and .gltf files are allowed",
                dto.filename
            )));
        }

        let folder = match kind {
            UploadKind::Model => &self.storage.models_folder,
            UploadKind::Thumbnail => &self.storage.thumbnails_folder,
        };
        let resource_type = kind.resource_type();
        let timestamp = now.timestamp();
        // Raw objects keep their extension; image URLs get the format appended
        let name = match kind {
            UploadKind::Model => sanitize_filename(&dto.filename),
            UploadKind::Thumbnail => sanitize_filename(file_stem(&dto.filename)),
        };
        let public_id = format!("{}_{}", now.timestamp_millis(), name);

        let params: BTreeMap<String, String> = [
            ("folder", folder.clone()),
            ("overwrite", "true".to_string()),
            ("public_id", public_id),
            ("resource_type", resource_type.as_str().to_string()),
            ("timestamp", timestamp.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let signature = sign_params(
            &params,
            &self.storage.api_secret,
            self.storage.signature_algorithm,
        );
        debug!(
            "Signed {} upload for '{}' at {}",
            resource_type.as_str(),
            dto.filename,
            timestamp
        );

        Ok(SignedUploadDto {
            signature,
            timestamp,
            api_key: self.storage.api_key.clone(),
            cloud_name: self.storage.cloud_name.clone(),
            upload_url: self.storage.upload_url(resource_type.as_str()),
            params,
        })
    }
}
