//! Role-based authorization middleware for Axum.
//!
//! Roles are read from the admin record resolved for the request, never from
//! the token, so a demoted or deactivated admin loses access immediately.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use scholaris_core::AppError;
use scholaris_models::AdminRole;

use crate::middleware::auth::CurrentAdmin;
use crate::state::AppState;

/// Fails with 403 when `role` is not one of `allowed`.
pub fn authorize(role: AdminRole, allowed: &[AdminRole]) -> Result<(), AppError> {
    if allowed.contains(&role) {
        return Ok(());
    }

    let required = allowed
        .iter()
        .map(AdminRole::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    Err(AppError::forbidden(format!(
        "Role {} is not authorized to access this route. Required: {}",
        role, required
    )))
}

/// Authenticates the request and checks the admin's role.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// Router::new()
///     .route("/", post(create_fee))
///     .route_layer(middleware::from_fn_with_state(state.clone(), |state, req, next| {
///         require_roles(state, req, next, AdminRole::ADMINS)
///     }));
/// ```
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed: &'static [AdminRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let CurrentAdmin(admin) = CurrentAdmin::from_request_parts(&mut parts, &state).await?;
    authorize(admin.role, allowed)?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

/// `super_admin` and `admin` routes.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, AdminRole::ADMINS).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Routes reserved for `super_admin`.
pub async fn require_super_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    match require_roles(State(state), req, next, &[AdminRole::SuperAdmin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admins_pass_admin_gate() {
        assert!(authorize(AdminRole::SuperAdmin, AdminRole::ADMINS).is_ok());
        assert!(authorize(AdminRole::Admin, AdminRole::ADMINS).is_ok());
    }

    #[test]
    fn test_staff_is_forbidden_from_admin_gate() {
        let err = authorize(AdminRole::Staff, AdminRole::ADMINS).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
        assert!(err.message().contains("staff"));
    }

    #[test]
    fn test_super_admin_gate() {
        assert!(authorize(AdminRole::SuperAdmin, &[AdminRole::SuperAdmin]).is_ok());
        assert!(authorize(AdminRole::Admin, &[AdminRole::SuperAdmin]).is_err());
    }
}
