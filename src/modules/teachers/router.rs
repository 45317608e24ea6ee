use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{create_teacher, delete_teacher, get_teacher, list_teachers, update_teacher};

pub fn init_teachers_public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers))
        .route("/{id}", get(get_teacher))
}

pub fn init_teachers_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_teacher))
        .route("/{id}", put(update_teacher).delete(delete_teacher))
}
