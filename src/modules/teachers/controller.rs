use axum::extract::{Multipart, Path, Query, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{ApiResponse, AppError, Empty, ErrorResponse, MessageResponse};

use crate::middleware::auth::MaybeAdmin;
use crate::state::AppState;
use crate::utils::multipart::{IMAGES, read_multipart, store_upload};
use crate::validator::{form_error, validate};

use super::model::{
    CreateTeacherDto, TeacherFilterParams, TeacherList, TeacherPayload, UpdateTeacherDto,
};
use super::service::TeacherService;

/// List teachers
///
/// Only active teachers are listed unless an admin passes `includeInactive=true`.
#[utoipa::path(
    get,
    path = "/api/teachers",
    params(TeacherFilterParams),
    responses(
        (status = 200, description = "Teachers", body = TeacherList)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, caller))]
pub async fn list_teachers(
    State(state): State<AppState>,
    caller: MaybeAdmin,
    Query(filters): Query<TeacherFilterParams>,
) -> Result<ApiResponse<TeacherList>, AppError> {
    let include_inactive = filters.include_inactive.unwrap_or(false) && caller.is_admin();
    let list = TeacherService::list(&state.db, filters, include_inactive).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher", body = TeacherPayload),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers"
)]
#[instrument(skip(state, caller))]
pub async fn get_teacher(
    State(state): State<AppState>,
    caller: MaybeAdmin,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<TeacherPayload>, AppError> {
    let teacher = TeacherService::get(&state.db, id, caller.is_admin()).await?;
    Ok(ApiResponse::ok(TeacherPayload { teacher }))
}

/// Create a teacher (multipart, optional `photo` image)
#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body(content_type = "multipart/form-data", description = "Teacher fields and an optional `photo`"),
    responses(
        (status = 201, description = "Teacher created", body = TeacherPayload),
        (status = 400, description = "Validation error or duplicate employee ID/email", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn create_teacher(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiResponse<TeacherPayload>, AppError> {
    let mut form = read_multipart(multipart).await?;
    let dto = CreateTeacherDto::from_form(&form.fields).map_err(form_error)?;
    validate(&dto)?;

    let photo_url = match form.take_file("photo") {
        Some(file) => Some(
            store_upload(state.storage.as_ref(), "teachers", &file, IMAGES)
                .await?
                .url,
        ),
        None => None,
    };

    let teacher = TeacherService::create(&state.db, dto, photo_url).await?;
    Ok(ApiResponse::created(TeacherPayload { teacher }).with_message("Teacher created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    request_body(content_type = "multipart/form-data", description = "Fields to change and an optional new `photo`"),
    responses(
        (status = 200, description = "Teacher updated", body = TeacherPayload),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<ApiResponse<TeacherPayload>, AppError> {
    let mut form = read_multipart(multipart).await?;
    let dto = UpdateTeacherDto::from_form(&form.fields).map_err(form_error)?;
    validate(&dto)?;

    let photo_url = match form.take_file("photo") {
        Some(file) => Some(
            store_upload(state.storage.as_ref(), "teachers", &file, IMAGES)
                .await?
                .url,
        ),
        None => None,
    };

    let teacher = TeacherService::update(&state.db, id, dto, photo_url).await?;
    Ok(ApiResponse::ok(TeacherPayload { teacher }).with_message("Teacher updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Teachers",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, AppError> {
    TeacherService::delete(&state.db, id).await?;
    Ok(ApiResponse::message_only("Teacher deleted successfully"))
}
