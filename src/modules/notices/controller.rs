use axum::extract::{Multipart, Path, Query, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{ApiResponse, AppError, Empty, ErrorResponse, MessageResponse};

use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::utils::multipart::{ATTACHMENTS, MultipartForm, read_multipart, store_upload};
use crate::validator::{form_error, validate};

use super::model::{CreateNoticeDto, NoticeFilterParams, NoticeList, NoticePayload, UpdateNoticeDto};
use super::service::NoticeService;

async fn store_attachment(
    state: &AppState,
    form: &mut MultipartForm,
) -> Result<Option<String>, AppError> {
    match form.take_file("attachment") {
        Some(file) => {
            let stored =
                store_upload(state.storage.as_ref(), "notices", &file, ATTACHMENTS).await?;
            Ok(Some(stored.url))
        }
        None => Ok(None),
    }
}

/// List published, unexpired notices
#[utoipa::path(
    get,
    path = "/api/notices",
    params(NoticeFilterParams),
    responses(
        (status = 200, description = "Visible notices", body = NoticeList)
    ),
    tag = "Notices"
)]
#[instrument(skip(state))]
pub async fn list_notices(
    State(state): State<AppState>,
    Query(filters): Query<NoticeFilterParams>,
) -> Result<ApiResponse<NoticeList>, AppError> {
    let list = NoticeService::list(&state.db, filters, true).await?;
    Ok(ApiResponse::ok(list))
}

/// List every notice, including drafts and expired ones
#[utoipa::path(
    get,
    path = "/api/notices/all",
    params(NoticeFilterParams),
    responses(
        (status = 200, description = "All notices", body = NoticeList),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_all_notices(
    State(state): State<AppState>,
    Query(filters): Query<NoticeFilterParams>,
) -> Result<ApiResponse<NoticeList>, AppError> {
    let list = NoticeService::list(&state.db, filters, false).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    get,
    path = "/api/notices/{id}",
    params(("id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice", body = NoticePayload),
        (status = 404, description = "Notice not found, unpublished or expired", body = ErrorResponse)
    ),
    tag = "Notices"
)]
#[instrument(skip(state))]
pub async fn get_notice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<NoticePayload>, AppError> {
    let notice = NoticeService::get(&state.db, id, true).await?;
    Ok(ApiResponse::ok(NoticePayload { notice }))
}

/// Create a notice (multipart, optional `attachment` image or PDF)
#[utoipa::path(
    post,
    path = "/api/notices",
    request_body(content_type = "multipart/form-data", description = "Notice fields and an optional `attachment`"),
    responses(
        (status = 201, description = "Notice created", body = NoticePayload),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, multipart))]
pub async fn create_notice(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    multipart: Multipart,
) -> Result<ApiResponse<NoticePayload>, AppError> {
    let mut form = read_multipart(multipart).await?;
    let dto = CreateNoticeDto::from_form(&form.fields).map_err(form_error)?;
    validate(&dto)?;

    let attachment_url = store_attachment(&state, &mut form).await?;
    let notice = NoticeService::create(&state.db, dto, attachment_url, admin.id).await?;

    Ok(ApiResponse::created(NoticePayload { notice }).with_message("Notice created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/notices/{id}",
    params(("id" = Uuid, Path, description = "Notice ID")),
    request_body(content_type = "multipart/form-data", description = "Fields to change and an optional new `attachment`"),
    responses(
        (status = 200, description = "Notice updated", body = NoticePayload),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Notice not found", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn update_notice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ApiResponse<NoticePayload>, AppError> {
    let mut form = read_multipart(multipart).await?;
    let dto = UpdateNoticeDto::from_form(&form.fields).map_err(form_error)?;
    validate(&dto)?;

    let attachment_url = store_attachment(&state, &mut form).await?;
    let notice = NoticeService::update(&state.db, id, dto, attachment_url).await?;

    Ok(ApiResponse::ok(NoticePayload { notice }).with_message("Notice updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/notices/{id}",
    params(("id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Notice not found", body = ErrorResponse)
    ),
    tag = "Notices",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_notice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, AppError> {
    NoticeService::delete(&state.db, id).await?;
    Ok(ApiResponse::message_only("Notice deleted successfully"))
}
