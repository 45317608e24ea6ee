use axum::extract::{Multipart, Path, Query, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{ApiResponse, AppError, Empty, ErrorResponse, MessageResponse};
use scholaris_models::AdmissionStatus;

use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::utils::multipart::{IMAGES, read_multipart, store_upload};
use crate::validator::{ValidatedJson, form_error, validate};

use super::model::{
    AdmissionFilterParams, AdmissionList, AdmissionPayload, AdmissionRemarksDto,
    AdmissionSubmission, ApprovalOutcome, ApproveAdmissionDto,
};
use super::service::AdmissionService;

/// Submit an admission application
///
/// Multipart form with the applicant fields, the address (either a JSON
/// `address` field or `address.street`, `address.city`, `address.state`,
/// `address.pincode`) and an optional `photo` image.
#[utoipa::path(
    post,
    path = "/api/admissions",
    request_body(content_type = "multipart/form-data", description = "Application fields and an optional `photo`"),
    responses(
        (status = 201, description = "Application received", body = AdmissionPayload),
        (status = 400, description = "Missing or invalid fields, incomplete address or invalid photo", body = ErrorResponse),
        (status = 500, description = "Photo upload or number allocation failed", body = ErrorResponse)
    ),
    tag = "Admissions"
)]
#[instrument(skip(state, multipart))]
pub async fn submit_admission(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<ApiResponse<AdmissionPayload>, AppError> {
    let mut form = read_multipart(multipart).await?;
    let submission = AdmissionSubmission::from_form(&form.fields).map_err(form_error)?;
    validate(&submission)?;

    let photo_url = match form.take_file("photo") {
        Some(file) => Some(
            store_upload(state.storage.as_ref(), "admissions", &file, IMAGES)
                .await?
                .url,
        ),
        None => None,
    };

    let admission = AdmissionService::submit(
        &state.db,
        &state.side_effects,
        &state.email_config,
        submission,
        photo_url,
    )
    .await?;

    Ok(ApiResponse::created(AdmissionPayload { admission })
        .with_message("Admission application submitted successfully"))
}

#[utoipa::path(
    get,
    path = "/api/admissions",
    params(AdmissionFilterParams),
    responses(
        (status = 200, description = "Admissions, newest first", body = AdmissionList),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_admissions(
    State(state): State<AppState>,
    Query(filters): Query<AdmissionFilterParams>,
) -> Result<ApiResponse<AdmissionList>, AppError> {
    let list = AdmissionService::list(&state.db, filters).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    get,
    path = "/api/admissions/{id}",
    params(("id" = Uuid, Path, description = "Admission ID")),
    responses(
        (status = 200, description = "Admission", body = AdmissionPayload),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_admission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<AdmissionPayload>, AppError> {
    let admission = AdmissionService::get(&state.db, id.into()).await?;
    Ok(ApiResponse::ok(AdmissionPayload { admission }))
}

/// Approve an admission and create the student
#[utoipa::path(
    put,
    path = "/api/admissions/{id}/approve",
    params(("id" = Uuid, Path, description = "Admission ID")),
    request_body = ApproveAdmissionDto,
    responses(
        (status = 200, description = "Admission approved", body = ApprovalOutcome),
        (status = 400, description = "Admission already approved", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn approve_admission(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ApproveAdmissionDto>,
) -> Result<ApiResponse<ApprovalOutcome>, AppError> {
    let outcome = AdmissionService::approve(
        &state.db,
        &state.side_effects,
        &state.email_config,
        id.into(),
        &admin,
        dto,
    )
    .await?;

    Ok(ApiResponse::ok(outcome).with_message("Admission approved and student created"))
}

#[utoipa::path(
    put,
    path = "/api/admissions/{id}/reject",
    params(("id" = Uuid, Path, description = "Admission ID")),
    request_body = AdmissionRemarksDto,
    responses(
        (status = 200, description = "Admission rejected", body = AdmissionPayload),
        (status = 400, description = "Admission already approved", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn reject_admission(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AdmissionRemarksDto>,
) -> Result<ApiResponse<AdmissionPayload>, AppError> {
    let admission = AdmissionService::decide(
        &state.db,
        id.into(),
        &admin,
        AdmissionStatus::Rejected,
        dto.remarks,
    )
    .await?;

    Ok(ApiResponse::ok(AdmissionPayload { admission }).with_message("Admission rejected"))
}

#[utoipa::path(
    put,
    path = "/api/admissions/{id}/hold",
    params(("id" = Uuid, Path, description = "Admission ID")),
    request_body = AdmissionRemarksDto,
    responses(
        (status = 200, description = "Admission put on hold", body = AdmissionPayload),
        (status = 400, description = "Admission already approved", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn hold_admission(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AdmissionRemarksDto>,
) -> Result<ApiResponse<AdmissionPayload>, AppError> {
    let admission = AdmissionService::decide(
        &state.db,
        id.into(),
        &admin,
        AdmissionStatus::OnHold,
        dto.remarks,
    )
    .await?;

    Ok(ApiResponse::ok(AdmissionPayload { admission }).with_message("Admission put on hold"))
}

#[utoipa::path(
    delete,
    path = "/api/admissions/{id}",
    params(("id" = Uuid, Path, description = "Admission ID")),
    responses(
        (status = 200, description = "Admission deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Admission not found", body = ErrorResponse)
    ),
    tag = "Admissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_admission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, AppError> {
    AdmissionService::delete(&state.db, id.into()).await?;
    Ok(ApiResponse::message_only("Admission deleted successfully"))
}
