use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{error, instrument};

use scholaris_core::{AppError, PageInfo};
use scholaris_models::NotificationId;

use crate::utils::sql::Filters;

use super::model::{NewNotification, Notification, NotificationFilterParams, NotificationList};

const NOTIFICATION_COLUMNS: &str = "id, type, title, message, link, related_id, related_model, \
                                    is_read, read_at, priority, created_at";

pub struct NotificationService;

impl NotificationService {
    /// Stores a notification. Never fails: errors are logged and `None` is
    /// returned, so a caller's outcome never depends on it.
    #[instrument(skip(db, notification), fields(kind = %notification.notification_type))]
    pub async fn raise(db: &PgPool, notification: NewNotification) -> Option<Notification> {
        let result = sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications (type, title, message, link, related_id, related_model, priority)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(notification.notification_type)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.link)
        .bind(notification.related_id)
        .bind(&notification.related_model)
        .bind(notification.priority)
        .fetch_one(db)
        .await;

        match result {
            Ok(notification) => Some(notification),
            Err(e) => {
                error!(error = %e, "Failed to create notification");
                None
            }
        }
    }

    #[instrument(skip(db))]
    pub async fn list(
        db: &PgPool,
        filters: NotificationFilterParams,
    ) -> Result<NotificationList, AppError> {
        let pagination = filters.pagination();
        let mut where_filters = Filters::new();

        if let Some(is_read) = filters.is_read {
            where_filters.raw(if is_read {
                "is_read = TRUE"
            } else {
                "is_read = FALSE"
            });
        }
        if let Some(kind) = filters.notification_type {
            where_filters.eq("type", kind.as_str());
        }

        let where_clause = where_filters.where_clause();

        let count_query = format!("SELECT COUNT(*) FROM notifications{}", where_clause);
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        for param in where_filters.params() {
            count_sql = count_sql.bind(param);
        }
        let total = count_sql.fetch_one(db).await?;

        let data_query = format!(
            "SELECT {} FROM notifications{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            NOTIFICATION_COLUMNS,
            where_clause,
            pagination.limit(),
            pagination.skip()
        );
        let mut data_sql = sqlx::query_as::<_, Notification>(&data_query);
        for param in where_filters.params() {
            data_sql = data_sql.bind(param);
        }
        let notifications = data_sql.fetch_all(db).await?;

        let unread_count = Self::unread_count(db).await?;

        Ok(NotificationList {
            page_info: PageInfo::new(&pagination, notifications.len(), total),
            unread_count,
            notifications,
        })
    }

    #[instrument(skip(db))]
    pub async fn unread_count(db: &PgPool) -> Result<i64, AppError> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE is_read = FALSE")
                .fetch_one(db)
                .await?;
        Ok(count)
    }

    #[instrument(skip(db))]
    pub async fn mark_read(db: &PgPool, id: NotificationId) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications
             SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
             WHERE id = $1
             RETURNING {}",
            NOTIFICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Notification not found")))
    }

    /// Returns the number of notifications that changed.
    #[instrument(skip(db))]
    pub async fn mark_all_read(db: &PgPool) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() WHERE is_read = FALSE",
        )
        .execute(db)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(db))]
    pub async fn delete(db: &PgPool, id: NotificationId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Notification not found")));
        }

        Ok(())
    }
}
