//! Storage module for uploaded model files
//!
//! Provides the [`ObjectStorage`] seam used by the upload pipeline and a
//! Cloudinary-compatible implementation backed by its HTTP upload API.

mod cloudinary_client;
pub mod signature;

use async_trait::async_trait;
use thiserror::Error;

pub use cloudinary_client::CloudinaryClient;

/// Resource type understood by the storage provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    /// Opaque binary content (GLB/GLTF models)
    Raw,
    /// Images (thumbnails)
    Image,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Raw => "raw",
            ResourceType::Image => "image",
        }
    }
}

/// A single object upload
#[derive(Debug)]
pub struct UploadRequest {
    pub data: Vec<u8>,
    /// Original filename, sent along with the bytes
    pub filename: String,
    /// Public id inside `folder`
    pub public_id: String,
    pub folder: String,
    pub resource_type: ResourceType,
    pub overwrite: bool,
}

/// What the provider reports back for a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Public (https) URL of the object
    pub url: String,
    /// Opaque handle used for later deletion
    pub storage_id: String,
    /// Stored size in bytes
    pub bytes: i64,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage provider rejected the request: {0}")]
    Rejected(String),

    #[error("unexpected storage response: {0}")]
    InvalidResponse(String),
}

/// Remote binary-object storage
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store a buffer and return its public URL, handle and size
    async fn upload(&self, request: UploadRequest) -> Result<StoredObject, StorageError>;

    /// Remove a previously stored object
    async fn destroy(
        &self,
        storage_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), StorageError>;
}
