//! Persistence for model records.
//!
//! [`ModelRepository`] is the seam the upload and view services depend on;
//! [`PgModelRepository`] is the Postgres implementation used in production.

use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::features::models::models::{ModelRecord, NewModelRecord};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("schema migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The insert completed without returning a row
    #[error("record was not persisted")]
    NotPersisted,
}

#[async_trait]
pub trait ModelRepository: Send + Sync {
    /// Create the `models` table and indexes if they are missing
    async fn ensure_schema(&self) -> Result<(), RepositoryError>;

    /// Insert a record, assigning its id and creation time
    async fn create(&self, record: NewModelRecord) -> Result<ModelRecord, RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ModelRecord>, RepositoryError>;

    /// Add one view. Returns the new count, or `None` when no record has `id`.
    async fn increment_view_count(&self, id: Uuid) -> Result<Option<i64>, RepositoryError>;
}

pub struct PgModelRepository {
    pool: PgPool,
}

impl PgModelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ModelRepository for PgModelRepository {
    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        debug!("Model schema is up to date");
        Ok(())
    }

    async fn create(&self, record: NewModelRecord) -> Result<ModelRecord, RepositoryError> {
        let id = Uuid::now_v7();

        let model = sqlx::query_as::<_, ModelRecord>(
            r#"
            INSERT INTO models (id, title, description, filename, storage_url, storage_id, file_size, metadata)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, title, description, filename, storage_url, storage_id, file_size,
                      metadata, view_count, created_at
            "#,
        )
        .bind(id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.filename)
        .bind(&record.storage_url)
        .bind(&record.storage_id)
        .bind(record.file_size)
        .bind(&record.metadata)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotPersisted)?;

        info!(
            "Model record saved: id={}, storage_id={}, size={}",
            model.id, model.storage_id, model.file_size
        );

        Ok(model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ModelRecord>, RepositoryError> {
        let model = sqlx::query_as::<_, ModelRecord>(
            r#"
            SELECT id, title, description, filename, storage_url, storage_id, file_size,
                   metadata, view_count, created_at
            FROM models
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(model)
    }

    async fn increment_view_count(&self, id: Uuid) -> Result<Option<i64>, RepositoryError> {
        let view_count = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE models
            SET view_count = view_count + 1
            WHERE id = $1
            RETURNING view_count
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        debug!("View recorded: id={}, view_count={:?}", id, view_count);

        Ok(view_count)
    }
}
