use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::models::dtos::ModelResponseDto;
use crate::features::models::repositories::ModelRepository;

/// Read access and view counting for model records
pub struct ModelViewService {
    repository: Arc<dyn ModelRepository>,
}

impl ModelViewService {
    pub fn new(repository: Arc<dyn ModelRepository>) -> Self {
        Self { repository }
    }

    /// Ids that are not UUIDs cannot exist, so they are reported as not found
    fn parse_id(raw: &str) -> Result<Uuid> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::BadRequest("Model id is required".to_string()));
        }

        Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Model {} not found", raw)))
    }

    /// Count one view of a model and return the new total
    pub async fn record_view(&self, raw_id: &str) -> Result<i64> {
        let id = Self::parse_id(raw_id)?;

        let view_count = self
            .repository
            .increment_view_count(id)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to record view for {}: {}", id, e)))?
            .ok_or_else(|| AppError::NotFound(format!("Model {} not found", id)))?;

        debug!("Model {} now has {} views", id, view_count);
        Ok(view_count)
    }

    pub async fn get_model(&self, raw_id: &str) -> Result<ModelResponseDto> {
        let id = Self::parse_id(raw_id)?;

        let model = self
            .repository
            .find_by_id(id)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to load model {}: {}", id, e)))?
            .ok_or_else(|| AppError::NotFound(format!("Model {} not found", id)))?;

        Ok(model.into())
    }
}
