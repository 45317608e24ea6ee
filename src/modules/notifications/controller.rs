use axum::extract::{Path, Query, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{ApiResponse, AppError, Empty, ErrorResponse, MessageResponse};

use crate::state::AppState;

use super::model::{
    MarkedRead, NotificationFilterParams, NotificationList, NotificationPayload, UnreadCount,
};
use super::service::NotificationService;

/// List notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationFilterParams),
    responses(
        (status = 200, description = "Notifications with the unread count", body = NotificationList),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(filters): Query<NotificationFilterParams>,
) -> Result<ApiResponse<NotificationList>, AppError> {
    let list = NotificationService::list(&state.db, filters).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Number of unread notifications", body = UnreadCount),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
pub async fn unread_count(
    State(state): State<AppState>,
) -> Result<ApiResponse<UnreadCount>, AppError> {
    let count = NotificationService::unread_count(&state.db).await?;
    Ok(ApiResponse::ok(UnreadCount { count }))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked as read", body = NotificationPayload),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<NotificationPayload>, AppError> {
    let notification = NotificationService::mark_read(&state.db, id.into()).await?;
    Ok(ApiResponse::ok(NotificationPayload { notification }))
}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked as read", body = MarkedRead),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn mark_all_read(
    State(state): State<AppState>,
) -> Result<ApiResponse<MarkedRead>, AppError> {
    let updated = NotificationService::mark_all_read(&state.db).await?;
    Ok(ApiResponse::ok(MarkedRead { updated })
        .with_message("All notifications marked as read"))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    tag = "Notifications",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, AppError> {
    NotificationService::delete(&state.db, id.into()).await?;
    Ok(ApiResponse::message_only("Notification deleted successfully"))
}
