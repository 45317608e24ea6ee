use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

use super::controller::{
    approve_admission, delete_admission, get_admission, hold_admission, list_admissions,
    reject_admission, submit_admission,
};

pub fn init_admissions_public_router() -> Router<AppState> {
    Router::new().route("/", post(submit_admission))
}

pub fn init_admissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admissions))
        .route("/{id}", get(get_admission))
}

pub fn init_admissions_admin_router() -> Router<AppState> {
    Router::new()
        .route("/{id}/approve", put(approve_admission))
        .route("/{id}/reject", put(reject_admission))
        .route("/{id}/hold", put(hold_admission))
        .route("/{id}", delete(delete_admission))
}
