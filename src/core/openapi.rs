use utoipa::{Modify, OpenApi};

use crate::features::models::{dtos as models_dtos, handlers as models_handlers};
use crate::features::upload_config::{dtos as config_dtos, handlers as config_handlers};
use crate::shared::types::{ErrorResponse, SuccessResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Models
        models_handlers::upload_model,
        models_handlers::get_model,
        models_handlers::record_view,
        // Upload config
        config_handlers::get_config,
        config_handlers::sign_upload,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            SuccessResponse,
            // Models
            models_dtos::UploadModelDto,
            models_dtos::UploadModelResponseDto,
            models_dtos::ModelResponseDto,
            // Upload config
            config_dtos::PublicConfigDto,
            config_dtos::SignUploadRequestDto,
            config_dtos::SignedUploadDto,
        )
    ),
    tags(
        (name = "models", description = "Furniture 3D model upload and view tracking"),
        (name = "config", description = "Storage settings and signed direct uploads"),
    ),
    info(
        title = "Furniture Viewer API",
        version = "0.1.0",
        description = "API documentation for the furniture 3D model viewer",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
