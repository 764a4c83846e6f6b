mod upload_service;
mod view_service;

pub use upload_service::{storage_public_id, ModelUpload, ModelUploadService};
pub use view_service::ModelViewService;
