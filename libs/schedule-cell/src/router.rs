use std::sync::Arc;

use axum::{routing::get, Router};

use shared_store::AppState;

use crate::handlers::*;

pub fn schedule_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/calendar", get(calendar_view))
        .route("/doctors/{id}", get(doctor_schedule))
        .route("/dashboard", get(dashboard))
        .with_state(state)
}
