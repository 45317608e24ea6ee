use anyhow::anyhow;
use serde_json::{Value, json};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::AppError;

use super::model::{ContentBlock, CreateContentDto, UpdateContentDto};

const CONTENT_COLUMNS: &str = "id, key, title, body, metadata, is_active, created_at, updated_at";

pub struct ContentService;

impl ContentService {
    #[instrument(skip(db))]
    pub async fn list_active(db: &PgPool) -> Result<Vec<ContentBlock>, AppError> {
        let contents = sqlx::query_as::<_, ContentBlock>(&format!(
            "SELECT {} FROM contents WHERE is_active = TRUE ORDER BY key",
            CONTENT_COLUMNS
        ))
        .fetch_all(db)
        .await?;

        Ok(contents)
    }

    /// Inactive blocks are hidden from the public site.
    #[instrument(skip(db))]
    pub async fn get_by_key(db: &PgPool, key: &str) -> Result<ContentBlock, AppError> {
        sqlx::query_as::<_, ContentBlock>(&format!(
            "SELECT {} FROM contents WHERE key = $1 AND is_active = TRUE",
            CONTENT_COLUMNS
        ))
        .bind(key)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Content not found")))
    }

    #[instrument(skip(db, dto), fields(key = %dto.key))]
    pub async fn create(db: &PgPool, dto: CreateContentDto) -> Result<ContentBlock, AppError> {
        let metadata = dto.metadata.unwrap_or_else(|| json!({}));

        sqlx::query_as::<_, ContentBlock>(&format!(
            "INSERT INTO contents (key, title, body, metadata, is_active)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            CONTENT_COLUMNS
        ))
        .bind(&dto.key)
        .bind(dto.title.trim())
        .bind(&dto.body)
        .bind(Json(metadata))
        .bind(dto.is_active.unwrap_or(true))
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(format!("Content with key '{}' already exists", dto.key));
            }
            AppError::from(e)
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateContentDto,
    ) -> Result<ContentBlock, AppError> {
        sqlx::query_as::<_, ContentBlock>(&format!(
            "UPDATE contents
             SET title = COALESCE($1, title),
                 body = COALESCE($2, body),
                 metadata = COALESCE($3, metadata),
                 is_active = COALESCE($4, is_active),
                 updated_at = NOW()
             WHERE id = $5
             RETURNING {}",
            CONTENT_COLUMNS
        ))
        .bind(dto.title.as_deref().map(str::trim))
        .bind(dto.body)
        .bind(dto.metadata.map(Json::<Value>))
        .bind(dto.is_active)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Content not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contents WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Content not found")));
        }

        Ok(())
    }
}
