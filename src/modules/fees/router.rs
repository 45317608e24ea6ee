use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_fee, create_payment_order, get_fee, get_student_fees, list_fees, manual_payment,
    verify_payment,
};

pub fn init_fees_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_fees))
        .route("/student/{student_id}", get(get_student_fees))
        .route("/{id}", get(get_fee))
        .route("/{id}/verify-payment", post(verify_payment))
        .route("/{id}/payment", post(create_payment_order))
}

pub fn init_fees_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_fee))
        .route("/{id}/manual-payment", post(manual_payment))
}
