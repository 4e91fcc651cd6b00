use std::sync::Arc;
use std::sync::OnceLock;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use regex::Regex;
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{sort_by_schedule, Appointment, AppointmentInput};
use crate::services::appointment::AppointmentRepository;

fn slot_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid slot pattern"))
}

/// Booking-form validation. Note what is deliberately absent: no check
/// that the chosen (doctor, date, slot) is free — the system never
/// prevents double booking.
fn validate(input: &AppointmentInput, reject_past_dates: bool) -> Result<(), AppError> {
    let mut problems = Vec::new();

    if input.patient_ref().is_none() {
        problems.push("patientId: Please select a patient");
    }
    if input.doctor_ref().is_none() {
        problems.push("doctorId: Please select a doctor");
    }
    match input.date {
        None => problems.push("date: Date is required"),
        Some(date) => {
            if reject_past_dates && date < Utc::now().date_naive() {
                problems.push("date: Appointment date cannot be in the past");
            }
        }
    }
    if input.time_slot.is_empty() || !slot_pattern().is_match(&input.time_slot) {
        problems.push("timeSlot: Time slot is required");
    }
    if input.appointment_type.trim().is_empty() {
        problems.push("type: Appointment type is required");
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(problems.join("; ")))
    }
}

/// The list view orders ascending by `(date, timeSlot)`; the repository
/// itself returns store order.
pub async fn list_appointments(State(state): State<Arc<AppState>>) -> Json<Vec<Appointment>> {
    let repo = AppointmentRepository::from_state(&state);
    let mut appointments = repo.get_all().await;
    sort_by_schedule(&mut appointments);
    Json(appointments)
}

pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Appointment>, AppError> {
    let repo = AppointmentRepository::from_state(&state);
    repo.get_by_id(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))
}

pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(input): Json<AppointmentInput>,
) -> Result<Json<Appointment>, AppError> {
    validate(&input, true)?;
    let repo = AppointmentRepository::from_state(&state);
    repo.create(&input)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to book appointment".to_string()))
}

/// Rescheduling an existing appointment may keep a date that has since
/// passed, so the past-date rule applies only to new bookings.
pub async fn update_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(input): Json<AppointmentInput>,
) -> Result<Json<Appointment>, AppError> {
    validate(&input, false)?;
    let repo = AppointmentRepository::from_state(&state);
    repo.update(id, &input)
        .await
        .map(Json)
        .ok_or_else(|| AppError::Internal("Failed to update appointment".to_string()))
}

pub async fn delete_appointment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Json<Value> {
    let repo = AppointmentRepository::from_state(&state);
    let deleted = repo.delete(id).await;
    Json(json!({ "deleted": deleted }))
}
