//! Cloudinary-compatible storage client
//!
//! Talks to the provider's REST upload API with signed multipart requests.
//! The server-side path is used by the upload handler; browsers performing a
//! direct upload get their signature from the config endpoint instead.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{multipart, Client, Response};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::modules::storage::signature::sign_params;
use crate::modules::storage::{
    ObjectStorage, ResourceType, StorageError, StoredObject, UploadRequest,
};

/// Successful upload response (subset of fields we use)
#[derive(Debug, Deserialize)]
struct UploadApiResponse {
    public_id: String,
    secure_url: String,
    bytes: i64,
}

/// Destroy response: `{"result": "ok"}` or `{"result": "not found"}`
#[derive(Debug, Deserialize)]
struct DestroyApiResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

/// Storage client for a Cloudinary-style upload API
pub struct CloudinaryClient {
    config: StorageConfig,
    http_client: Client,
}

impl CloudinaryClient {
    pub fn new(config: StorageConfig) -> Result<Self, StorageError> {
        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        debug!(
            "Storage client configured: cloud={}, models folder={}",
            config.cloud_name, config.models_folder
        );

        Ok(Self {
            config,
            http_client,
        })
    }

    pub fn cloud_name(&self) -> &str {
        &self.config.cloud_name
    }

    /// Parameters covered by the upload signature
    fn upload_params(&self, request: &UploadRequest, timestamp: i64) -> BTreeMap<String, String> {
        let mut params = BTreeMap::new();
        params.insert("folder".to_string(), request.folder.clone());
        params.insert("overwrite".to_string(), request.overwrite.to_string());
        params.insert("public_id".to_string(), request.public_id.clone());
        params.insert("timestamp".to_string(), timestamp.to_string());
        params
    }

    fn sign(&self, params: &BTreeMap<String, String>) -> String {
        sign_params(
            params,
            &self.config.api_secret,
            self.config.signature_algorithm,
        )
    }

    /// Turn a non-2xx response into [`StorageError::Rejected`]
    async fn rejection(response: Response) -> StorageError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|parsed| parsed.error.message)
            .unwrap_or(body);

        StorageError::Rejected(format!("{} - {}", status, message))
    }
}

#[async_trait]
impl ObjectStorage for CloudinaryClient {
    async fn upload(&self, request: UploadRequest) -> Result<StoredObject, StorageError> {
        let timestamp = Utc::now().timestamp();
        let params = self.upload_params(&request, timestamp);
        let signature = self.sign(&params);

        let size = request.data.len();
        let file_part = multipart::Part::bytes(request.data).file_name(request.filename.clone());

        let form = params
            .into_iter()
            .fold(multipart::Form::new(), |form, (key, value)| {
                form.text(key, value)
            })
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .part("file", file_part);

        let url = self.config.upload_url(request.resource_type.as_str());
        debug!(
            "Uploading '{}' ({} bytes) to {}",
            request.public_id, size, url
        );

        let response = self.http_client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: UploadApiResponse = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        info!(
            "Stored object '{}' ({} bytes) in cloud '{}'",
            body.public_id, body.bytes, self.config.cloud_name
        );

        Ok(StoredObject {
            url: body.secure_url,
            storage_id: body.public_id,
            bytes: body.bytes,
        })
    }

    async fn destroy(
        &self,
        storage_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), StorageError> {
        let timestamp = Utc::now().timestamp();

        let mut params = BTreeMap::new();
        params.insert("public_id".to_string(), storage_id.to_string());
        params.insert("timestamp".to_string(), timestamp.to_string());
        let signature = self.sign(&params);

        let form = params
            .into_iter()
            .fold(multipart::Form::new(), |form, (key, value)| {
                form.text(key, value)
            })
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);

        let response = self
            .http_client
            .post(self.config.destroy_url(resource_type.as_str()))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let body: DestroyApiResponse = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        match body.result.as_str() {
            "ok" => {
                debug!("Destroyed object '{}'", storage_id);
                Ok(())
            }
            "not found" => {
                warn!("Object '{}' was already gone", storage_id);
                Ok(())
            }
            other => Err(StorageError::InvalidResponse(format!(
                "destroy of '{}' returned '{}'",
                storage_id, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::signature::SignatureAlgorithm;
    use crate::shared::test_helpers::sample_storage_config;

    fn client_with(algorithm: SignatureAlgorithm) -> CloudinaryClient {
        let mut config = sample_storage_config("abcd");
        config.signature_algorithm = algorithm;
        CloudinaryClient::new(config).unwrap()
    }

    fn client() -> CloudinaryClient {
        client_with(SignatureAlgorithm::Sha1)
    }

    #[test]
    fn test_sign_uses_configured_algorithm() {
        let mut params = BTreeMap::new();
        params.insert("timestamp".to_string(), "1315060510".to_string());

        assert_eq!(
            client_with(SignatureAlgorithm::Sha1).sign(&params),
            "a21ad0f63beb4de2e5575204b79ab90bffb02c10"
        );
        assert_eq!(
            client_with(SignatureAlgorithm::Sha256).sign(&params),
            "5652e549a70bdc03f73a633a23b7d3f3b067d72fff26dd15b25997f46fdf6439"
        );
    }

    #[test]
    fn test_upload_params_cover_signed_fields() {
        let request = UploadRequest {
            data: vec![1, 2, 3],
            filename: "chair.glb".to_string(),
            public_id: "1700000000000_chair.glb".to_string(),
            folder: "furniture-models".to_string(),
            resource_type: ResourceType::Raw,
            overwrite: true,
        };

        let params = client().upload_params(&request, 1_700_000_000);

        assert_eq!(
            params.keys().collect::<Vec<_>>(),
            vec!["folder", "overwrite", "public_id", "timestamp"]
        );
        assert_eq!(params["overwrite"], "true");
        assert_eq!(params["timestamp"], "1700000000");
    }

    #[test]
    fn test_api_error_body_parses() {
        let parsed: ApiErrorBody =
            serde_json::from_str(r#"{"error":{"message":"Invalid Signature"}}"#).unwrap();
        assert_eq!(parsed.error.message, "Invalid Signature");
    }

    #[test]
    fn test_upload_response_parses() {
        let parsed: UploadApiResponse = serde_json::from_str(
            r#"{
                "public_id": "furniture-models/1700000000000_chair.glb",
                "secure_url": "https://res.cloudinary.com/demo/raw/upload/v1/furniture-models/1700000000000_chair.glb",
                "bytes": 5242880,
                "resource_type": "raw"
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.bytes, 5_242_880);
        assert!(parsed.secure_url.starts_with("https://"));
    }
}
