use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::core::config::{StorageConfig, UploadConfig};
use crate::features::models::handlers::ModelsState;
use crate::features::models::models::{ModelRecord, NewModelRecord};
use crate::features::models::repositories::{ModelRepository, RepositoryError};
use crate::features::models::routes;
use crate::features::models::services::{ModelUploadService, ModelViewService};
use crate::modules::storage::signature::SignatureAlgorithm;
use crate::modules::storage::{
    ObjectStorage, ResourceType, StorageError, StoredObject, UploadRequest,
};

/// What the fake storage saw for one upload
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub filename: String,
    pub public_id: String,
    pub folder: String,
    pub resource_type: ResourceType,
    pub overwrite: bool,
    pub size: usize,
}

impl RecordedUpload {
    pub fn storage_id(&self) -> String {
        format!("{}/{}", self.folder, self.public_id)
    }
}

/// In-memory [`ObjectStorage`] that records every call
#[derive(Default)]
pub struct FakeStorage {
    fail_uploads: bool,
    fail_destroys: bool,
    uploads: Mutex<Vec<RecordedUpload>>,
    destroyed: Mutex<Vec<String>>,
}

impl FakeStorage {
    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    pub fn failing_destroys() -> Self {
        Self {
            fail_destroys: true,
            ..Self::default()
        }
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn upload(&self, request: UploadRequest) -> Result<StoredObject, StorageError> {
        if self.fail_uploads {
            return Err(StorageError::Rejected("500 - storage unavailable".to_string()));
        }

        let recorded = RecordedUpload {
            filename: request.filename,
            public_id: request.public_id,
            folder: request.folder,
            resource_type: request.resource_type,
            overwrite: request.overwrite,
            size: request.data.len(),
        };
        let storage_id = recorded.storage_id();
        let bytes = recorded.size as i64;
        self.uploads.lock().unwrap().push(recorded);

        Ok(StoredObject {
            url: format!("https://res.example.com/demo/raw/upload/{}", storage_id),
            storage_id,
            bytes,
        })
    }

    async fn destroy(
        &self,
        storage_id: &str,
        _resource_type: ResourceType,
    ) -> Result<(), StorageError> {
        self.destroyed.lock().unwrap().push(storage_id.to_string());

        if self.fail_destroys {
            return Err(StorageError::Rejected("500 - destroy failed".to_string()));
        }
        Ok(())
    }
}

/// In-memory [`ModelRepository`]
#[derive(Default)]
pub struct InMemoryModelRepository {
    fail_inserts: bool,
    records: Mutex<Vec<ModelRecord>>,
}

impl InMemoryModelRepository {
    pub fn failing_inserts() -> Self {
        Self {
            fail_inserts: true,
            ..Self::default()
        }
    }

    /// Insert a record directly, bypassing the upload path
    pub fn seed(&self, record: ModelRecord) -> ModelRecord {
        self.records.lock().unwrap().push(record.clone());
        record
    }

    pub fn all(&self) -> Vec<ModelRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn view_count(&self, id: Uuid) -> Option<i64> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.view_count)
    }
}

#[async_trait]
impl ModelRepository for InMemoryModelRepository {
    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn create(&self, record: NewModelRecord) -> Result<ModelRecord, RepositoryError> {
        if self.fail_inserts {
            return Err(RepositoryError::NotPersisted);
        }

        let model = ModelRecord {
            id: Uuid::now_v7(),
            title: record.title,
            description: record.description,
            filename: record.filename,
            storage_url: record.storage_url,
            storage_id: record.storage_id,
            file_size: record.file_size,
            metadata: record.metadata,
            view_count: 0,
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(model.clone());
        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ModelRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Option<i64>, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        Ok(records.iter_mut().find(|r| r.id == id).map(|r| {
            r.view_count += 1;
            r.view_count
        }))
    }
}

/// A stored record as if it had been uploaded a moment ago
pub fn sample_record(filename: &str) -> ModelRecord {
    let storage_id = format!("furniture-models/1700000000000_{}", filename);
    ModelRecord {
        id: Uuid::now_v7(),
        title: crate::shared::validation::file_stem(filename).to_string(),
        description: String::new(),
        filename: filename.to_string(),
        storage_url: format!("https://res.example.com/demo/raw/upload/{}", storage_id),
        storage_id,
        file_size: 2048,
        metadata: json!({ "contentType": "model/gltf-binary" }),
        view_count: 0,
        created_at: Utc::now(),
    }
}

/// Storage settings for a `demo` cloud signed with `api_secret`
pub fn sample_storage_config(api_secret: &str) -> StorageConfig {
    StorageConfig {
        cloud_name: "demo".to_string(),
        api_key: "123456".to_string(),
        api_secret: api_secret.to_string(),
        api_base_url: "https://api.example.com/v1_1".to_string(),
        models_folder: "furniture-models".to_string(),
        thumbnails_folder: "furniture-thumbnails".to_string(),
        request_timeout: Duration::from_secs(5),
        signature_algorithm: SignatureAlgorithm::Sha1,
    }
}

/// Model services wired to the given fakes
pub fn models_state(
    storage: Arc<FakeStorage>,
    repository: Arc<InMemoryModelRepository>,
    limits: UploadConfig,
) -> ModelsState {
    let upload_service = Arc::new(ModelUploadService::new(
        storage,
        repository.clone(),
        limits,
        "furniture-models".to_string(),
        "http://localhost:3000".to_string(),
    ));
    let view_service = Arc::new(ModelViewService::new(repository));

    ModelsState {
        upload_service,
        view_service,
    }
}

/// Models router wired to the given fakes
pub fn models_router(
    storage: Arc<FakeStorage>,
    repository: Arc<InMemoryModelRepository>,
    limits: UploadConfig,
) -> Router {
    routes::routes(models_state(storage, repository, limits))
}
