use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_gallery_item, delete_gallery_item, get_gallery_item, list_gallery, update_gallery_item,
};

pub fn init_gallery_public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_gallery))
        .route("/{id}", get(get_gallery_item))
}

pub fn init_gallery_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_gallery_item))
        .route("/{id}", put(update_gallery_item).delete(delete_gallery_item))
}
