use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{change_password, login, logout, me, register};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Routes for any authenticated admin.
pub fn init_auth_session_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/password", put(change_password))
}

pub fn init_auth_super_admin_router() -> Router<AppState> {
    Router::new().route("/register", post(register))
}
