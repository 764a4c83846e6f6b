use std::sync::Arc;

use crate::features::models::services::{ModelUploadService, ModelViewService};

mod upload_handler;
mod view_handler;

pub use upload_handler::*;
pub use view_handler::*;

/// State shared by the model handlers
#[derive(Clone)]
pub struct ModelsState {
    pub upload_service: Arc<ModelUploadService>,
    pub view_service: Arc<ModelViewService>,
}
