use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{Doctor, DoctorInput};
use crate::services::doctor::DoctorRepository;

fn validate(input: &DoctorInput) -> Result<(), AppError> {
    let mut problems = Vec::new();

    if input.name.trim().is_empty() {
        problems.push("name: Name is required");
    }
    if input.specialization.trim().is_empty() {
        problems.push("specialization: Specialization is required");
    }
    if input.appointment_duration <= 0 {
        problems.push("appointmentDuration: Slot duration must be positive");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(problems.join("; ")))
    }
}

pub async fn list_doctors(State(state): State<Arc<AppState>>) -> Json<Vec<Doctor>> {
    let repo = DoctorRepository::from_state(&state);
    Json(repo.get_all().await)
}

pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Doctor>, AppError> {
    let repo = DoctorRepository::from_state(&state);
    repo.get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))
}

pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Json(input): Json<DoctorInput>,
) -> Result<Json<Doctor>, AppError> {
    validate(&input)?;
    let repo = DoctorRepository::from_state(&state);
    repo.create(&input)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to add doctor".to_string()))
}

pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<DoctorInput>,
) -> Result<Json<Doctor>, AppError> {
    validate(&input)?;
    let repo = DoctorRepository::from_state(&state);
    repo.update(id, &input)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to update doctor".to_string()))
}

pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<Value> {
    let repo = DoctorRepository::from_state(&state);
    let deleted = repo.delete(id).await;
    Json(json!({ "deleted": deleted }))
}
