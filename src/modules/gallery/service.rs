use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use scholaris_core::file_storage::{FileStorage, StoredObject};
use scholaris_core::{AppError, PageInfo};

use crate::utils::sql::Filters;

use super::model::{
    CreateGalleryItemDto, GalleryFilterParams, GalleryItem, GalleryList, UpdateGalleryItemDto,
};

const GALLERY_COLUMNS: &str = "id, title, description, category, image_url, storage_key, \
                               is_active, created_at, updated_at";

pub struct GalleryService;

impl GalleryService {
    #[instrument(skip(db, dto, image), fields(key = %image.key))]
    pub async fn create(
        db: &PgPool,
        dto: CreateGalleryItemDto,
        image: StoredObject,
    ) -> Result<GalleryItem, AppError> {
        let item = sqlx::query_as::<_, GalleryItem>(&format!(
            "INSERT INTO gallery_items (title, description, category, image_url, storage_key, is_active)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            GALLERY_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.category)
        .bind(&image.url)
        .bind(&image.key)
        .bind(dto.is_active)
        .fetch_one(db)
        .await?;

        Ok(item)
    }

    /// Active items only, newest first.
    #[instrument(skip(db))]
    pub async fn list(db: &PgPool, filters: GalleryFilterParams) -> Result<GalleryList, AppError> {
        let pagination = filters.pagination();
        let mut where_filters = Filters::new();
        where_filters.raw("is_active = TRUE");
        if let Some(category) = filters.category {
            where_filters.eq("category", category.as_str());
        }
        let where_clause = where_filters.where_clause();

        let count_query = format!("SELECT COUNT(*) FROM gallery_items{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in where_filters.params() {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM gallery_items{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            GALLERY_COLUMNS,
            where_clause,
            pagination.limit(),
            pagination.skip()
        );
        let mut data_sql = sqlx::query_as::<_, GalleryItem>(&data_query);
        for param in where_filters.params() {
            data_sql = data_sql.bind(param);
        }
        let items = data_sql.fetch_all(db).await?;

        Ok(GalleryList {
            page_info: PageInfo::new(&pagination, items.len(), total),
            items,
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: Uuid) -> Result<GalleryItem, AppError> {
        sqlx::query_as::<_, GalleryItem>(&format!(
            "SELECT {} FROM gallery_items WHERE id = $1 AND is_active = TRUE",
            GALLERY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Gallery item not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateGalleryItemDto,
    ) -> Result<GalleryItem, AppError> {
        sqlx::query_as::<_, GalleryItem>(&format!(
            "UPDATE gallery_items
             SET title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 category = COALESCE($3, category),
                 is_active = COALESCE($4, is_active),
                 updated_at = NOW()
             WHERE id = $5
             RETURNING {}",
            GALLERY_COLUMNS
        ))
        .bind(dto.title)
        .bind(dto.description)
        .bind(dto.category)
        .bind(dto.is_active)
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Gallery item not found")))
    }

    /// Deletes the row, then the stored image. A failure to delete the image
    /// is logged and does not fail the request.
    #[instrument(skip(db, storage))]
    pub async fn delete(db: &PgPool, storage: &dyn FileStorage, id: Uuid) -> Result<(), AppError> {
        let storage_key = sqlx::query_scalar::<_, String>(
            "DELETE FROM gallery_items WHERE id = $1 RETURNING storage_key",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Gallery item not found")))?;

        if let Err(e) = storage.delete(&storage_key).await {
            warn!(error = %e, key = %storage_key, "Failed to delete gallery image");
        }

        Ok(())
    }
}
