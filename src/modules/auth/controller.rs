use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use tracing::instrument;

use scholaris_core::{ApiResponse, AppError, Empty, ErrorResponse, MessageResponse};

use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{AdminPayload, ChangePasswordDto, LoginRequest, LoginResponse, RegisterAdminDto};
use super::service::{AuthService, auth_cookie, clear_auth_cookie};

/// Login and receive a JWT (also set as the `token` cookie)
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials or deactivated account", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    let cookie = auth_cookie(
        &response.token,
        state.jwt_config.access_token_expiry,
        state.server_config.cookie_secure,
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiResponse::ok(response).with_message("Login successful"),
    ))
}

/// Clear the auth cookie
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse)
    ),
    tag = "Authentication"
)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(
            header::SET_COOKIE,
            clear_auth_cookie(state.server_config.cookie_secure),
        )],
        ApiResponse::<Empty>::message_only("Logged out successfully"),
    )
}

/// Get the authenticated admin
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current admin", body = AdminPayload),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
pub async fn me(CurrentAdmin(admin): CurrentAdmin) -> ApiResponse<AdminPayload> {
    ApiResponse::ok(AdminPayload { admin })
}

/// Create another admin account (super admin only)
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterAdminDto,
    responses(
        (status = 201, description = "Admin created", body = AdminPayload),
        (status = 400, description = "Validation error or email already registered", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Requires super_admin", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterAdminDto>,
) -> Result<ApiResponse<AdminPayload>, AppError> {
    let admin = AuthService::register(&state.db, dto).await?;
    Ok(ApiResponse::created(AdminPayload { admin }).with_message("Admin created successfully"))
}

/// Change the authenticated admin's password
#[utoipa::path(
    put,
    path = "/api/auth/password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<ApiResponse<Empty>, AppError> {
    AuthService::change_password(&state.db, &admin, dto).await?;
    Ok(ApiResponse::message_only("Password updated successfully"))
}
