use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_store::AppState;

use crate::handlers::*;

pub fn medical_record_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_medical_records))
        .route("/", post(create_medical_record))
        .route("/{id}", get(get_medical_record))
        .route("/{id}", put(update_medical_record))
        .route("/{id}", delete(delete_medical_record))
        .route("/patient/{id}", get(list_records_for_patient))
        .with_state(state)
}
