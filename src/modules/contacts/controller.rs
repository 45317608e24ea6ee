use axum::extract::{Path, Query, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{ApiResponse, AppError, Empty, ErrorResponse, MessageResponse};

use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    ContactFilterParams, ContactList, ContactPayload, CreateContactDto, UpdateContactStatusDto,
};
use super::service::ContactService;

/// Submit a message from the public contact form
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = CreateContactDto,
    responses(
        (status = 201, description = "Message received", body = ContactPayload),
        (status = 400, description = "Validation error", body = ErrorResponse)
    ),
    tag = "Contacts"
)]
#[instrument(skip(state, dto))]
pub async fn create_contact(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateContactDto>,
) -> Result<ApiResponse<ContactPayload>, AppError> {
    let contact = ContactService::create(&state.db, &state.side_effects, dto).await?;
    Ok(ApiResponse::created(ContactPayload { contact })
        .with_message("Thank you for contacting us. We will get back to you soon."))
}

#[utoipa::path(
    get,
    path = "/api/contacts",
    params(ContactFilterParams),
    responses(
        (status = 200, description = "Contact messages", body = ContactList),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(filters): Query<ContactFilterParams>,
) -> Result<ApiResponse<ContactList>, AppError> {
    let list = ContactService::list(&state.db, filters).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact message", body = ContactPayload),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<ContactPayload>, AppError> {
    let contact = ContactService::get(&state.db, id).await?;
    Ok(ApiResponse::ok(ContactPayload { contact }))
}

#[utoipa::path(
    put,
    path = "/api/contacts/{id}/status",
    params(("id" = Uuid, Path, description = "Contact ID")),
    request_body = UpdateContactStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ContactPayload),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_contact_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateContactStatusDto>,
) -> Result<ApiResponse<ContactPayload>, AppError> {
    let contact = ContactService::update_status(&state.db, id, dto.status).await?;
    Ok(ApiResponse::ok(ContactPayload { contact }).with_message("Contact status updated"))
}

#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(("id" = Uuid, Path, description = "Contact ID")),
    responses(
        (status = 200, description = "Contact deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    ),
    tag = "Contacts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Empty>, AppError> {
    ContactService::delete(&state.db, id).await?;
    Ok(ApiResponse::message_only("Contact deleted successfully"))
}
