use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::core::config::UploadConfig;
use crate::core::error::{AppError, Result};
use crate::features::models::dtos::{resolve_content_type, UploadModelResponseDto};
use crate::features::models::models::NewModelRecord;
use crate::features::models::repositories::ModelRepository;
use crate::modules::storage::{ObjectStorage, ResourceType, StoredObject, UploadRequest};
use crate::shared::validation::{file_extension, file_stem, sanitize_filename};

/// A validated file ready to be stored
#[derive(Debug)]
pub struct ModelUpload {
    pub data: Vec<u8>,
    pub filename: String,
    /// Content type declared by the client, if any
    pub content_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Public id for a stored model: `{unix_millis}_{sanitized filename}`
pub fn storage_public_id(filename: &str, uploaded_at: DateTime<Utc>) -> String {
    format!(
        "{}_{}",
        uploaded_at.timestamp_millis(),
        sanitize_filename(filename)
    )
}

/// Uploads model files to storage and records them in the database
pub struct ModelUploadService {
    storage: Arc<dyn ObjectStorage>,
    repository: Arc<dyn ModelRepository>,
    limits: UploadConfig,
    folder: String,
    public_base_url: String,
}

impl ModelUploadService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        repository: Arc<dyn ModelRepository>,
        limits: UploadConfig,
        folder: String,
        public_base_url: String,
    ) -> Self {
        Self {
            storage,
            repository,
            limits,
            folder,
            public_base_url,
        }
    }

    pub fn limits(&self) -> &UploadConfig {
        &self.limits
    }

    fn view_url(&self, id: &uuid::Uuid) -> String {
        format!("{}/view/{}", self.public_base_url, id)
    }

    /// Store the file, then persist its record.
    ///
    /// If the insert fails the stored object is destroyed again; a failed
    /// destroy is logged with the object's id and the insert error is returned.
    pub async fn upload(&self, upload: ModelUpload) -> Result<UploadModelResponseDto> {
        let uploaded_at = Utc::now();
        let extension = file_extension(&upload.filename).unwrap_or_default();
        let content_type = resolve_content_type(upload.content_type.as_deref(), &extension);

        let title = upload
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| file_stem(&upload.filename).to_string());
        let description = upload.description.unwrap_or_default();

        let request = UploadRequest {
            data: upload.data,
            filename: upload.filename.clone(),
            public_id: storage_public_id(&upload.filename, uploaded_at),
            folder: self.folder.clone(),
            resource_type: ResourceType::Raw,
            overwrite: true,
        };

        let stored = self.storage.upload(request).await?;
        debug!(
            "Model file stored: storage_id={}, bytes={}",
            stored.storage_id, stored.bytes
        );

        let record = NewModelRecord {
            title,
            description,
            filename: upload.filename,
            storage_url: stored.url.clone(),
            storage_id: stored.storage_id.clone(),
            file_size: stored.bytes,
            metadata: json!({
                "contentType": content_type,
                "uploadedAt": uploaded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            }),
        };

        let model = match self.repository.create(record).await {
            Ok(model) => model,
            Err(e) => {
                self.discard_orphan(&stored).await;
                return Err(AppError::PersistenceFailed(e));
            }
        };

        info!(
            "Model uploaded: id={}, title={}, size={}",
            model.id, model.title, model.file_size
        );

        Ok(UploadModelResponseDto {
            success: true,
            id: model.id,
            view_url: self.view_url(&model.id),
            direct_url: model.storage_url,
            title: model.title,
            file_size: model.file_size,
            message: "Model uploaded successfully".to_string(),
        })
    }

    async fn discard_orphan(&self, stored: &StoredObject) {
        warn!(
            "Record insert failed, removing stored object '{}'",
            stored.storage_id
        );

        if let Err(e) = self
            .storage
            .destroy(&stored.storage_id, ResourceType::Raw)
            .await
        {
            error!(
                "Orphaned storage object '{}' ({}) could not be removed: {}",
                stored.storage_id, stored.url, e
            );
        }
    }
}
