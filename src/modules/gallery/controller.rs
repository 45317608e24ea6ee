use axum::extract::{Multipart, Path, Query, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{ApiResponse, AppError, Empty, ErrorResponse, MessageResponse};

use crate::state::AppState;
use crate::utils::multipart::{IMAGES, read_multipart, store_upload};
use crate::validator::{ValidatedJson, form_error, validate};

use super::model::{
    CreateGalleryItemDto, GalleryFilterParams, GalleryItemPayload, GalleryList,
    UpdateGalleryItemDto,
};
use super::service::GalleryService;

/// List active gallery items
#[utoipa::path(
    get,
    path = "/api/gallery",
    params(GalleryFilterParams),
    responses(
        (status = 200, description = "Gallery items", body = GalleryList)
    ),
    tag = "Gallery"
)]
#[instrument(skip(state))]
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(filters): Query<GalleryFilterParams>,
) -> Result<ApiResponse<GalleryList>, AppError> {
    let list = GalleryService::list(&state.db, filters).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    get,
    path = "/api/gallery/{id}",
    params(("id" = Uuid, Path, description = "Gallery item ID")),
    responses(
        (status = 200, description = "Gallery item", body = GalleryItemPayload),
        (status = 404, description = "Gallery item not found", body = ErrorResponse)
    ),
    tag = "Gallery"
)]
#[instrument(skip(state))]
pub async fn get_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<GalleryItemPayload>, AppError> {
    let item = GalleryService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(GalleryItemPayload { item }))
}

/// Upload a gallery image (multipart, required `image`)
#[utoipa::path(
    post,
    path = "/api/gallery",
    request_body(content_type = "multipart/form-data", description = "Item fields and the `image` file"),
    responses(
        (status = 201, description = "Gallery item created", body = GalleryItemPayload),
        (status = 400, description = "Validation error or missing image", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse)
    ),
    tag = "Gallery",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, multipart))]
pub async fn create_gallery_item(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiResponse<GalleryItemPayload>, AppError> {
    let mut form = read_multipart(multipart).await?;
    let dto = CreateGalleryItemDto::from_form(&form.fields).map_err(form_error)?;
    validate(&dto)?;

    let file = form
        .take_file("image")
        .ok_or_else(|| AppError::validation("image is required"))?;
    let image = store_upload(state.storage.as_ref(), "gallery", &file, IMAGES).await?;

    let item = GalleryService::create(&state.db, dto, image).await?;
    Ok(ApiResponse::created(GalleryItemPayload { item })
        .with_message("Gallery item created successfully"))
}

#[utoipa::path(
    put,
    path = "/api/gallery/{id}",
    params(("id" = Uuid, Path, description = "Gallery item ID")),
    request_body = UpdateGalleryItemDto,
    responses(
        (status = 200, description = "Gallery item updated", body = GalleryItemPayload),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Gallery item not found", body = ErrorResponse)
    ),
    tag = "Gallery",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateGalleryItemDto>,
) -> Result<ApiResponse<GalleryItemPayload>, AppError> {
    let item = GalleryService::update(&state.db, id, dto).await?;
    Ok(ApiResponse::ok(GalleryItemPayload { item }).with_message("Gallery item updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/api/gallery/{id}",
    params(("id" = Uuid, Path, description = "Gallery item ID")),
    responses(
        (status = 200, description = "Gallery item and its image deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Gallery item not found", body = ErrorResponse)
    ),
    tag = "Gallery",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_gallery_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, AppError> {
    GalleryService::delete(&state.db, state.storage.as_ref(), id).await?;
    Ok(ApiResponse::message_only("Gallery item deleted successfully"))
}
