use std::sync::Arc;
use std::sync::OnceLock;

use axum::{
    extract::{Path, State},
    Json,
};
use regex::Regex;
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{Patient, PatientInput};
use crate::services::patient::PatientRepository;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid email pattern"))
}

/// Required-field validation is the form layer's responsibility, not the
/// repository's; this mirrors the registration form's checks.
fn validate(input: &PatientInput) -> Result<(), AppError> {
    let mut problems = Vec::new();

    if input.first_name.trim().is_empty() {
        problems.push("firstName: First name is required");
    }
    if input.last_name.trim().is_empty() {
        problems.push("lastName: Last name is required");
    }
    if input.date_of_birth.is_none() {
        problems.push("dateOfBirth: Date of birth is required");
    }
    if input.gender.is_none() {
        problems.push("gender: Gender is required");
    }
    if input.phone.trim().is_empty() {
        problems.push("phone: Phone number is required");
    }
    if input.email.trim().is_empty() {
        problems.push("email: Email is required");
    } else if !email_pattern().is_match(input.email.trim()) {
        problems.push("email: Please enter a valid email address");
    }
    if input.blood_type.is_none() {
        problems.push("bloodType: Blood type is required");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(problems.join("; ")))
    }
}

pub async fn list_patients(State(state): State<Arc<AppState>>) -> Json<Vec<Patient>> {
    let repo = PatientRepository::from_state(&state);
    Json(repo.get_all().await)
}

pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Patient>, AppError> {
    let repo = PatientRepository::from_state(&state);
    repo.get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))
}

pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Json(input): Json<PatientInput>,
) -> Result<Json<Patient>, AppError> {
    validate(&input)?;
    let repo = PatientRepository::from_state(&state);
    repo.create(&input)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to register patient".to_string()))
}

pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<PatientInput>,
) -> Result<Json<Patient>, AppError> {
    validate(&input)?;
    let repo = PatientRepository::from_state(&state);
    repo.update(id, &input)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to update patient".to_string()))
}

pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<Value> {
    let repo = PatientRepository::from_state(&state);
    let deleted = repo.delete(id).await;
    Json(json!({ "deleted": deleted }))
}
