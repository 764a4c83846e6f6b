use std::sync::Arc;

use axum::{routing::get, Router};

use crate::core::middleware::method_not_allowed;
use crate::features::upload_config::handlers;
use crate::features::upload_config::services::UploadConfigService;

/// Create routes for the upload config feature
pub fn routes(service: Arc<UploadConfigService>) -> Router {
    Router::new()
        .route(
            "/config",
            get(handlers::get_config)
                .post(handlers::sign_upload)
                .fallback(method_not_allowed),
        )
        .with_state(service)
}
