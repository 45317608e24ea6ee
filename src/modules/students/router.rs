use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{create_student, delete_student, get_student, get_students, update_student};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_students))
        .route("/{id}", get(get_student))
}

pub fn init_students_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student))
        .route("/{id}", put(update_student).delete(delete_student))
}
