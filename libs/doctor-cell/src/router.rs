use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use shared_store::AppState;

use crate::handlers::*;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list_doctors))
        .route("/", post(create_doctor))
        .route("/{id}", get(get_doctor))
        .route("/{id}", put(update_doctor))
        .route("/{id}", delete(delete_doctor))
        .with_state(state)
}
