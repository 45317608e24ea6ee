use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{create_content, delete_content, get_content, list_content, update_content};

pub fn init_content_public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_content))
        .route("/{key}", get(get_content))
}

/// `PUT`/`DELETE` take the block id, `GET` takes its key.
pub fn init_content_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_content))
        .route("/{key}", put(update_content).delete(delete_content))
}
