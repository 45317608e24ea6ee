use anyhow::anyhow;
use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{AppError, PageInfo};
use scholaris_models::AdminId;

use crate::utils::sql::Filters;

use super::model::{CreateNoticeDto, Notice, NoticeFilterParams, NoticeList, UpdateNoticeDto};

const NOTICE_COLUMNS: &str = "id, title, content, category, priority, attachment_url, is_published, \
                              publish_date, expiry_date, created_by, created_at, updated_at";

const VISIBLE: &str = "is_published = TRUE AND (expiry_date IS NULL OR expiry_date > NOW())";

pub struct NoticeService;

impl NoticeService {
    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create(
        db: &PgPool,
        dto: CreateNoticeDto,
        attachment_url: Option<String>,
        created_by: AdminId,
    ) -> Result<Notice, AppError> {
        let notice = sqlx::query_as::<_, Notice>(&format!(
            "INSERT INTO notices (title, content, category, priority, attachment_url,
                                  is_published, publish_date, expiry_date, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {}",
            NOTICE_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(dto.category)
        .bind(dto.priority)
        .bind(attachment_url)
        .bind(dto.is_published)
        .bind(dto.publish_date.unwrap_or_else(Utc::now))
        .bind(dto.expiry_date)
        .bind(created_by)
        .fetch_one(db)
        .await?;

        Ok(notice)
    }

    /// Lists notices, newest first. With `visible_only` unpublished and
    /// expired notices are left out.
    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: NoticeFilterParams,
        visible_only: bool,
    ) -> Result<NoticeList, AppError> {
        let pagination = filters.pagination();
        let mut where_filters = Filters::new();
        if visible_only {
            where_filters.raw(VISIBLE);
        }
        if let Some(category) = filters.category {
            where_filters.eq("category", category.as_str());
        }
        if let Some(priority) = filters.priority {
            where_filters.eq("priority", priority.as_str());
        }
        let where_clause = where_filters.where_clause();

        let count_query = format!("SELECT COUNT(*) FROM notices{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in where_filters.params() {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM notices{} ORDER BY publish_date DESC, created_at DESC LIMIT {} OFFSET {}",
            NOTICE_COLUMNS,
            where_clause,
            pagination.limit(),
            pagination.skip()
        );
        let mut data_sql = sqlx::query_as::<_, Notice>(&data_query);
        for param in where_filters.params() {
            data_sql = data_sql.bind(param);
        }
        let notices = data_sql.fetch_all(db).await?;

        Ok(NoticeList {
            page_info: PageInfo::new(&pagination, notices.len(), total),
            notices,
        })
    }

    #[instrument(skip(db))]
    pub async fn get(db: &PgPool, id: Uuid, visible_only: bool) -> Result<Notice, AppError> {
        sqlx::query_as::<_, Notice>(&format!(
            "SELECT {} FROM notices WHERE id = $1",
            NOTICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .filter(|notice| !visible_only || notice.is_visible_at(Utc::now()))
        .ok_or_else(|| AppError::not_found(anyhow!("Notice not found")))
    }

    #[instrument(skip(db, dto))]
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        dto: UpdateNoticeDto,
        attachment_url: Option<String>,
    ) -> Result<Notice, AppError> {
        let mut tx = db.begin().await?;

        let current = sqlx::query_as::<_, Notice>(&format!(
            "SELECT {} FROM notices WHERE id = $1 FOR UPDATE",
            NOTICE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Notice not found")))?;

        // The new dates are checked against the stored ones when only one changes.
        let publish_date = dto.publish_date.unwrap_or(current.publish_date);
        let expiry_date = dto.expiry_date.or(current.expiry_date);
        if let Some(expiry) = expiry_date
            && expiry <= publish_date
        {
            return Err(AppError::validation("expiryDate must be after publishDate"));
        }

        let notice = sqlx::query_as::<_, Notice>(&format!(
            "UPDATE notices
             SET title = COALESCE($1, title),
                 content = COALESCE($2, content),
                 category = COALESCE($3, category),
                 priority = COALESCE($4, priority),
                 attachment_url = COALESCE($5, attachment_url),
                 is_published = COALESCE($6, is_published),
                 publish_date = $7,
                 expiry_date = $8,
                 updated_at = NOW()
             WHERE id = $9
             RETURNING {}",
            NOTICE_COLUMNS
        ))
        .bind(dto.title)
        .bind(dto.content)
        .bind(dto.category)
        .bind(dto.priority)
        .bind(attachment_url)
        .bind(dto.is_published)
        .bind(publish_date)
        .bind(expiry_date)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(notice)
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notices WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Notice not found")));
        }

        Ok(())
    }
}
