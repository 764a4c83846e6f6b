use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::core::middleware::method_not_allowed;
use crate::features::models::handlers::{get_model, record_view, upload_model, ModelsState};

/// Multipart framing allowance on top of the file size ceiling
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create routes for the models feature
pub fn routes(state: ModelsState) -> Router {
    let body_limit = state.upload_service.limits().max_file_size + MULTIPART_OVERHEAD;

    Router::new()
        .route(
            "/upload",
            post(upload_model)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/model/{id}/view",
            post(record_view).fallback(method_not_allowed),
        )
        .route("/model/{id}", get(get_model).fallback(method_not_allowed))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use fake::faker::filesystem::en::FileExtension;
    use fake::Fake;
    use serde_json::Value;
    use uuid::Uuid;

    use crate::core::config::UploadConfig;
    use crate::features::models::dtos::UploadModelResponseDto;
    use crate::shared::test_helpers::{
        models_router, sample_record, FakeStorage, InMemoryModelRepository,
    };

    struct Harness {
        server: TestServer,
        storage: Arc<FakeStorage>,
        repository: Arc<InMemoryModelRepository>,
    }

    fn harness_with(
        storage: FakeStorage,
        repository: InMemoryModelRepository,
        limits: UploadConfig,
    ) -> Harness {
        let storage = Arc::new(storage);
        let repository = Arc::new(repository);
        let router = models_router(storage.clone(), repository.clone(), limits);

        Harness {
            server: TestServer::new(router).unwrap(),
            storage,
            repository,
        }
    }

    fn harness() -> Harness {
        harness_with(
            FakeStorage::default(),
            InMemoryModelRepository::default(),
            UploadConfig::default(),
        )
    }

    fn model_part(filename: &str, size: usize) -> Part {
        Part::bytes(vec![0x67u8; size])
            .file_name(filename)
            .mime_type("application/octet-stream")
    }

    #[tokio::test]
    async fn test_upload_oak_chair() {
        let h = harness();
        let form = MultipartForm::new()
            .add_text("title", "Oak Chair")
            .add_part("file", model_part("chair.glb", 5 * 1024 * 1024));

        let response = h.server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadModelResponseDto = response.json();
        assert!(body.success);
        assert_eq!(body.title, "Oak Chair");
        assert_eq!(body.file_size, 5_242_880);

        let records = h.repository.all();
        assert_eq!(records.len(), 1);
        assert_eq!(body.id, records[0].id);
        assert_eq!(body.direct_url, records[0].storage_url);
        assert!(body.view_url.ends_with(&format!("/view/{}", body.id)));
    }

    #[tokio::test]
    async fn test_upload_with_description() {
        let h = harness();
        let form = MultipartForm::new()
            .add_part("file", model_part("Sofa.GLTF", 128))
            .add_text("description", "Three seater");

        let response = h.server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let records = h.repository.all();
        assert_eq!(records[0].title, "Sofa");
        assert_eq!(records[0].description, "Three seater");
        assert_eq!(records[0].metadata["contentType"], "model/gltf+json");
    }

    #[tokio::test]
    async fn test_upload_rejects_txt() {
        let h = harness();
        let form = MultipartForm::new().add_part("file", model_part("chair.txt", 64));

        let response = h.server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(h.storage.uploads().is_empty());
        assert!(h.repository.all().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_random_non_model_extensions() {
        let h = harness();

        for _ in 0..10 {
            let ext: String = FileExtension().fake();
            if ext.eq_ignore_ascii_case("glb") || ext.eq_ignore_ascii_case("gltf") {
                continue;
            }
            let form = MultipartForm::new()
                .add_part("file", model_part(&format!("chair.{}", ext), 16));

            let response = h.server.post("/upload").multipart(form).await;
            response.assert_status(StatusCode::BAD_REQUEST);
        }

        assert!(h.storage.uploads().is_empty());
        assert!(h.repository.all().is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file_without_upstream_calls() {
        let limits = UploadConfig {
            max_file_size: 1024,
            ..UploadConfig::default()
        };
        let h = harness_with(
            FakeStorage::default(),
            InMemoryModelRepository::default(),
            limits,
        );
        let form = MultipartForm::new().add_part("file", model_part("chair.glb", 1025));

        let response = h.server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(h.storage.uploads().is_empty());
        assert!(h.repository.all().is_empty());
    }

    #[tokio::test]
    async fn test_upload_accepts_file_at_exact_limit() {
        let limits = UploadConfig {
            max_file_size: 1024,
            ..UploadConfig::default()
        };
        let h = harness_with(
            FakeStorage::default(),
            InMemoryModelRepository::default(),
            limits,
        );
        let form = MultipartForm::new().add_part("file", model_part("chair.glb", 1024));

        let response = h.server.post("/upload").multipart(form).await;

        response.assert_status_ok();
        let body: UploadModelResponseDto = response.json();
        assert_eq!(body.file_size, 1024);
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected() {
        let h = harness();
        let form = MultipartForm::new().add_text("title", "Oak Chair");

        let response = h.server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "No file uploaded");
    }

    #[tokio::test]
    async fn test_upload_storage_failure_is_500() {
        let h = harness_with(
            FakeStorage::failing_uploads(),
            InMemoryModelRepository::default(),
            UploadConfig::default(),
        );
        let form = MultipartForm::new().add_part("file", model_part("chair.glb", 64));

        let response = h.server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], "Failed to upload file to storage");
        assert!(h.repository.all().is_empty());
    }

    #[tokio::test]
    async fn test_upload_insert_failure_is_500_and_compensates() {
        let h = harness_with(
            FakeStorage::default(),
            InMemoryModelRepository::failing_inserts(),
            UploadConfig::default(),
        );
        let form = MultipartForm::new().add_part("file", model_part("chair.glb", 64));

        let response = h.server.post("/upload").multipart(form).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], "Failed to save model record");
        assert_eq!(h.storage.uploads().len(), 1);
        assert_eq!(h.storage.destroyed().len(), 1);
    }

    #[tokio::test]
    async fn test_upload_wrong_method() {
        let h = harness();

        let response = h.server.get("/upload").await;

        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_record_view_increments() {
        let h = harness();
        let record = h.repository.seed(sample_record("chair.glb"));
        let path = format!("/model/{}/view", record.id);

        for _ in 0..3 {
            let response = h.server.post(&path).await;
            response.assert_status_ok();
            response.assert_json(&serde_json::json!({ "success": true }));
        }

        assert_eq!(h.repository.view_count(record.id), Some(3));
    }

    #[tokio::test]
    async fn test_record_view_unknown_id() {
        let h = harness();
        let record = h.repository.seed(sample_record("chair.glb"));

        h.server
            .post("/model/unknown-id/view")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        h.server
            .post(&format!("/model/{}/view", Uuid::now_v7()))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        assert_eq!(h.repository.view_count(record.id), Some(0));
    }

    #[tokio::test]
    async fn test_record_view_wrong_method() {
        let h = harness();

        h.server
            .get("/model/some-id/view")
            .await
            .assert_status(StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_get_model() {
        let h = harness();
        let record = h.repository.seed(sample_record("chair.glb"));

        let response = h.server.get(&format!("/model/{}", record.id)).await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], record.id.to_string());
        assert_eq!(body["viewCount"], 0);
        assert_eq!(body["storageId"], record.storage_id);
    }
}
