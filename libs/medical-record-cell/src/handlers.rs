use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{MedicalRecord, MedicalRecordInput};
use crate::services::medical_record::MedicalRecordRepository;

fn validate(input: &MedicalRecordInput) -> Result<(), AppError> {
    let mut problems = Vec::new();

    if input.patient_ref().is_none() {
        problems.push("patientId: Please select a patient");
    }
    if input.doctor_ref().is_none() {
        problems.push("doctorId: Please select a doctor");
    }
    if input.diagnosis.trim().is_empty() {
        problems.push("diagnosis: Diagnosis is required");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(problems.join("; ")))
    }
}

pub async fn list_medical_records(State(state): State<Arc<AppState>>) -> Json<Vec<MedicalRecord>> {
    let repo = MedicalRecordRepository::from_state(&state);
    Json(repo.get_all().await)
}

pub async fn get_medical_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MedicalRecord>, AppError> {
    let repo = MedicalRecordRepository::from_state(&state);
    repo.get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Medical record not found".to_string()))
}

pub async fn list_records_for_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
) -> Json<Vec<MedicalRecord>> {
    let repo = MedicalRecordRepository::from_state(&state);
    Json(repo.get_by_patient(patient_id).await)
}

pub async fn create_medical_record(
    State(state): State<Arc<AppState>>,
    Json(input): Json<MedicalRecordInput>,
) -> Result<Json<MedicalRecord>, AppError> {
    validate(&input)?;
    let repo = MedicalRecordRepository::from_state(&state);
    repo.create(&input)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to add medical record".to_string()))
}

pub async fn update_medical_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<MedicalRecordInput>,
) -> Result<Json<MedicalRecord>, AppError> {
    validate(&input)?;
    let repo = MedicalRecordRepository::from_state(&state);
    repo.update(id, &input)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to update medical record".to_string()))
}

pub async fn delete_medical_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<Value> {
    let repo = MedicalRecordRepository::from_state(&state);
    let deleted = repo.delete(id).await;
    Json(json!({ "deleted": deleted }))
}
