use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_contact, delete_contact, get_contact, list_contacts, update_contact_status,
};

pub fn init_contacts_public_router() -> Router<AppState> {
    Router::new().route("/", post(create_contact))
}

pub fn init_contacts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts))
        .route("/{id}", get(get_contact))
        .route("/{id}/status", put(update_contact_status))
}

pub fn init_contacts_admin_router() -> Router<AppState> {
    Router::new().route("/{id}", delete(delete_contact))
}
