use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for an uploaded 3D model
#[derive(Debug, Clone, FromRow)]
pub struct ModelRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub filename: String,
    pub storage_url: String,
    pub storage_id: String,
    pub file_size: i64,
    /// Freeform JSON object (`contentType`, `uploadedAt`, ...)
    pub metadata: serde_json::Value,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Values for a record that has not been inserted yet
#[derive(Debug, Clone)]
pub struct NewModelRecord {
    pub title: String,
    pub description: String,
    pub filename: String,
    pub storage_url: String,
    pub storage_id: String,
    pub file_size: i64,
    pub metadata: serde_json::Value,
}
