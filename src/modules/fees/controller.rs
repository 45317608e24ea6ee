use axum::extract::{Path, Query, State};
use tracing::instrument;
use uuid::Uuid;

use scholaris_core::{ApiResponse, AppError, ErrorResponse};

use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateFeeDto, CreateOrderDto, FeeFilterParams, FeeList, FeePayload, ManualPaymentDto,
    PaymentOrder, PaymentReceipt, StudentFees, VerifyPaymentDto,
};
use super::service::FeeService;

/// Create a fee record for a student
#[utoipa::path(
    post,
    path = "/api/fees",
    request_body = CreateFeeDto,
    responses(
        (status = 201, description = "Fee record created", body = FeePayload),
        (status = 400, description = "Invalid fee structure", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_fee(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateFeeDto>,
) -> Result<ApiResponse<FeePayload>, AppError> {
    let fee = FeeService::create(&state.db, dto).await?;
    Ok(ApiResponse::created(FeePayload { fee }).with_message("Fee record created successfully"))
}

#[utoipa::path(
    get,
    path = "/api/fees",
    params(FeeFilterParams),
    responses(
        (status = 200, description = "Fee records with student details", body = FeeList),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn list_fees(
    State(state): State<AppState>,
    Query(filters): Query<FeeFilterParams>,
) -> Result<ApiResponse<FeeList>, AppError> {
    let list = FeeService::list(&state.db, filters).await?;
    Ok(ApiResponse::ok(list))
}

#[utoipa::path(
    get,
    path = "/api/fees/{id}",
    params(("id" = Uuid, Path, description = "Fee record ID")),
    responses(
        (status = 200, description = "Fee record with payments", body = FeePayload),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Fee record not found", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_fee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<FeePayload>, AppError> {
    let fee = FeeService::get(&state.db, id.into()).await?;
    Ok(ApiResponse::ok(FeePayload { fee }))
}

#[utoipa::path(
    get,
    path = "/api/fees/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Fee records of the student", body = StudentFees),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_student_fees(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<ApiResponse<StudentFees>, AppError> {
    let fees = FeeService::for_student(&state.db, student_id.into()).await?;
    Ok(ApiResponse::ok(fees))
}

/// Verify a gateway checkout and record the payment
#[utoipa::path(
    post,
    path = "/api/fees/{id}/verify-payment",
    params(("id" = Uuid, Path, description = "Fee record ID")),
    request_body = VerifyPaymentDto,
    responses(
        (status = 200, description = "Payment verified and recorded", body = PaymentReceipt),
        (status = 400, description = "Payment verification failed", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Fee record not found", body = ErrorResponse),
        (status = 500, description = "Gateway secret not configured", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn verify_payment(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<VerifyPaymentDto>,
) -> Result<ApiResponse<PaymentReceipt>, AppError> {
    let receipt = FeeService::verify_payment(
        &state.db,
        &state.side_effects,
        &state.email_config,
        &state.payment_config,
        id.into(),
        &admin,
        dto,
    )
    .await?;

    Ok(ApiResponse::ok(receipt).with_message("Payment verified and recorded successfully"))
}

/// Record a payment taken at the school office
#[utoipa::path(
    post,
    path = "/api/fees/{id}/manual-payment",
    params(("id" = Uuid, Path, description = "Fee record ID")),
    request_body = ManualPaymentDto,
    responses(
        (status = 200, description = "Payment recorded", body = PaymentReceipt),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires admin role", body = ErrorResponse),
        (status = 404, description = "Fee record not found", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn manual_payment(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<ManualPaymentDto>,
) -> Result<ApiResponse<PaymentReceipt>, AppError> {
    let receipt = FeeService::manual_payment(
        &state.db,
        &state.side_effects,
        &state.email_config,
        id.into(),
        &admin,
        dto,
    )
    .await?;

    Ok(ApiResponse::ok(receipt).with_message("Payment recorded successfully"))
}

/// Create a gateway order for the checkout widget
#[utoipa::path(
    post,
    path = "/api/fees/{id}/payment",
    params(("id" = Uuid, Path, description = "Fee record ID")),
    request_body = CreateOrderDto,
    responses(
        (status = 200, description = "Gateway order created", body = PaymentOrder),
        (status = 400, description = "Invalid amount", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "Fee record not found", body = ErrorResponse),
        (status = 500, description = "Gateway not configured or unavailable", body = ErrorResponse)
    ),
    tag = "Fees",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_payment_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateOrderDto>,
) -> Result<ApiResponse<PaymentOrder>, AppError> {
    let order =
        FeeService::create_order(&state.db, &state.payment_config, id.into(), dto.amount).await?;
    Ok(ApiResponse::ok(order))
}
