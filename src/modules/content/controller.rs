use axum::extract::{Path, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{ApiResponse, AppError, Empty, ErrorResponse, MessageResponse};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{ContentList, ContentPayload, CreateContentDto, UpdateContentDto};
use super::service::ContentService;

/// List active content blocks
#[utoipa::path(
    get,
    path = "/api/content",
    responses(
        (status = 200, description = "Active content blocks", body = ContentList)
    ),
    tag = "Content"
)]
#[instrument(skip(state))]
pub async fn list_content(State(state): State<AppState>) -> Result<ApiResponse<ContentList>, AppError> {
    let contents = ContentService::list_active(&state.db).await?;
    Ok(ApiResponse::ok(ContentList {
        count: contents.len() as i64,
        contents,
    }))
}

/// Get an active content block by key
#[utoipa::path(
    get,
    path = "/api/content/{key}",
    params(("key" = String, Path, description = "Content key, e.g. `home-banner`")),
    responses(
        (status = 200, description = "Content block", body = ContentPayload),
        (status = 404, description = "Content not found", body = ErrorResponse)
    ),
    tag = "Content"
)]
#[instrument(skip(state))]
pub async fn get_content(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<ApiResponse<ContentPayload>, AppError> {
    let content = ContentService::get_by_key(&state.db, &key).await?;
    Ok(ApiResponse::ok(ContentPayload { content }))
}

#[utoipa::path(
    post,
    path = "/api/content",
    request_body = CreateContentDto,
    responses(
        (status = 201, description = "Content created", body = ContentPayload),
        (status = 400, description = "Validation error or duplicate key", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse)
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_content(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateContentDto>,
) -> Result<ApiResponse<ContentPayload>, AppError> {
    let content = ContentService::create(&state.db, dto).await?;
    Ok(ApiResponse::created(ContentPayload { content }).with_message("Content created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/content/{id}",
    params(("id" = Uuid, Path, description = "Content ID")),
    request_body = UpdateContentDto,
    responses(
        (status = 200, description = "Content updated", body = ContentPayload),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Content not found", body = ErrorResponse)
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateContentDto>,
) -> Result<ApiResponse<ContentPayload>, AppError> {
    let content = ContentService::update(&state.db, id, dto).await?;
    Ok(ApiResponse::ok(ContentPayload { content }).with_message("Content updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/content/{id}",
    params(("id" = Uuid, Path, description = "Content ID")),
    responses(
        (status = 200, description = "Content deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Content not found", body = ErrorResponse)
    ),
    tag = "Content",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, AppError> {
    ContentService::delete(&state.db, id).await?;
    Ok(ApiResponse::message_only("Content deleted successfully"))
}
