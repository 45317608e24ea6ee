use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use scholaris_auth::verify_token;
use scholaris_core::AppError;
use scholaris_models::Admin;

use crate::modules::auth::service::{AUTH_COOKIE, AuthService};
use crate::state::AppState;

/// The authenticated admin, re-read from the database for this request.
#[derive(Debug, Clone)]
pub struct CurrentAdmin(pub Admin);

/// Finds the credential of a request. The `token` cookie wins over an
/// `Authorization: Bearer` header.
pub fn credential(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE)
        && !cookie.value().trim().is_empty()
    {
        return Some(cookie.value().trim().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Resolves the request's credential to an active admin.
///
/// Fails with 401 when the credential is absent or invalid, or when the
/// admin it names no longer exists or is inactive.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Admin, AppError> {
    let token = credential(headers)
        .ok_or_else(|| AppError::unauthorized("Not authorized, no token"))?;

    let claims = verify_token(&token, &state.jwt_config)?;
    let admin_id = claims
        .admin_id()
        .ok_or_else(|| AppError::unauthorized("Invalid token subject"))?;

    let admin = AuthService::find_admin(&state.db, admin_id.into())
        .await?
        .ok_or_else(|| AppError::unauthorized("Admin no longer exists"))?;

    if !admin.is_active {
        return Err(AppError::unauthorized("Account is deactivated"));
    }

    Ok(admin)
}

impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(current) = parts.extensions.get::<CurrentAdmin>() {
            return Ok(current.clone());
        }

        let admin = authenticate(state, &parts.headers).await?;
        parts.extensions.insert(CurrentAdmin(admin.clone()));
        Ok(CurrentAdmin(admin))
    }
}

/// The admin behind a request on a public route, if any. An invalid
/// credential is treated as anonymous instead of rejected.
#[derive(Debug, Clone)]
pub struct MaybeAdmin(pub Option<Admin>);

impl MaybeAdmin {
    /// True for an active admin with an admin role.
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(|admin| admin.role.is_admin())
    }
}

impl FromRequestParts<AppState> for MaybeAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if credential(&parts.headers).is_none() {
            return Ok(MaybeAdmin(None));
        }
        Ok(MaybeAdmin(authenticate(state, &parts.headers).await.ok()))
    }
}

/// Route layer admitting any active admin.
///
/// ```rust,ignore
/// Router::new()
///     .route("/", get(list_notifications))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
/// ```
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    match CurrentAdmin::from_request_parts(&mut parts, &state).await {
        Ok(_) => next.run(Request::from_parts(parts, body)).await,
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(credential(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; token=from-cookie"),
        );
        assert_eq!(credential(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_empty_cookie_falls_back_to_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("token="));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(credential(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_missing_or_malformed() {
        assert_eq!(credential(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(credential(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(credential(&headers), None);
    }
}
