use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;

use appointment_cell::models::Appointment;
use appointment_cell::services::appointment::AppointmentRepository;
use doctor_cell::models::Doctor;
use doctor_cell::services::doctor::DoctorRepository;
use patient_cell::models::Patient;
use patient_cell::services::patient::PatientRepository;
use shared_models::error::AppError;
use shared_store::AppState;
use shared_utils::date::week_of;

use crate::models::{SlotConfig, StatusCounts, WeekSummary};
use crate::services::grid::SlotGrid;
use crate::services::stats;

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    /// Any date inside the requested week; defaults to today.
    pub start: Option<NaiveDate>,
}

/// An appointment enriched with display names. Dangling references are
/// tolerated and render as "Unknown".
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentEntry {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub patient_name: String,
    pub doctor_name: String,
}

impl AppointmentEntry {
    fn resolve(appointment: &Appointment, patients: &[Patient], doctors: &[Doctor]) -> Self {
        let patient_name = patients
            .iter()
            .find(|patient| patient.id == appointment.patient_id)
            .map(Patient::full_name)
            .unwrap_or_else(|| "Unknown".to_string());
        let doctor_name = doctors
            .iter()
            .find(|doctor| doctor.id == appointment.doctor_id)
            .map(|doctor| doctor.name.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            appointment: appointment.clone(),
            patient_name,
            doctor_name: format!("Dr. {}", doctor_name),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarView {
    pub week: Vec<NaiveDate>,
    pub time_slots: Vec<String>,
    pub days: Vec<CalendarDay>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub count: usize,
    pub slots: BTreeMap<String, CalendarCell>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub appointments: Vec<AppointmentEntry>,
    /// Collapsed remainder behind the "+N more" affordance.
    pub overflow: usize,
}

/// Week calendar: patients, doctors and appointments are loaded jointly;
/// if any one load fails the whole view fails with a single error.
pub async fn calendar_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<CalendarView>, AppError> {
    let appointment_repo = AppointmentRepository::from_state(&state);
    let patient_repo = PatientRepository::from_state(&state);
    let doctor_repo = DoctorRepository::from_state(&state);
    let (appointments, patients, doctors) = tokio::try_join!(
        appointment_repo.fetch_all(),
        patient_repo.fetch_all(),
        doctor_repo.fetch_all(),
    )
    .map_err(|err| {
        error!("Failed to load calendar data: {}", err);
        AppError::Store("Failed to load appointments data. Please try again.".to_string())
    })?;

    let reference = query.start.unwrap_or_else(|| Utc::now().date_naive());
    let week = week_of(reference);
    let config = SlotConfig::hourly();
    let grid = SlotGrid::new(&appointments);

    let days = week
        .iter()
        .map(|day| {
            let slots = config
                .slots()
                .iter()
                .map(|slot| {
                    let cell = grid.cell(*day, slot);
                    (
                        slot.clone(),
                        CalendarCell {
                            appointments: cell
                                .visible
                                .iter()
                                .map(|apt| AppointmentEntry::resolve(apt, &patients, &doctors))
                                .collect(),
                            overflow: cell.overflow,
                        },
                    )
                })
                .collect();
            CalendarDay {
                date: *day,
                count: grid.day_count(*day),
                slots,
            }
        })
        .collect();

    Ok(Json(CalendarView {
        week: week.to_vec(),
        time_slots: config.slots().to_vec(),
        days,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorScheduleView {
    pub doctor: Doctor,
    pub week: Vec<NaiveDate>,
    pub time_slots: Vec<String>,
    pub days: Vec<DoctorScheduleDay>,
    pub summary: WeekSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorScheduleDay {
    pub date: NaiveDate,
    pub count: usize,
    pub slots: BTreeMap<String, DoctorSlot>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSlot {
    pub appointments: Vec<Appointment>,
    pub available: bool,
}

pub async fn doctor_schedule(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i64>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<DoctorScheduleView>, AppError> {
    let doctor = DoctorRepository::from_state(&state)
        .get_by_id(doctor_id)
        .await
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

    let appointments = AppointmentRepository::from_state(&state)
        .fetch_all()
        .await
        .map_err(|err| {
            error!("Failed to load schedule data: {}", err);
            AppError::Store("Failed to load schedule data. Please try again.".to_string())
        })?;

    let reference = query.start.unwrap_or_else(|| Utc::now().date_naive());
    let week = week_of(reference);
    let config = SlotConfig::hourly();
    let grid = SlotGrid::new(&appointments);

    let days = week
        .iter()
        .map(|day| {
            let slots = config
                .slots()
                .iter()
                .map(|slot| {
                    (
                        slot.clone(),
                        DoctorSlot {
                            appointments: grid
                                .doctor_bucket(doctor_id, *day, slot)
                                .into_iter()
                                .cloned()
                                .collect(),
                            available: grid.is_available(doctor_id, *day, slot),
                        },
                    )
                })
                .collect();
            DoctorScheduleDay {
                date: *day,
                count: grid.doctor_day_count(doctor_id, *day),
                slots,
            }
        })
        .collect();

    let summary = grid.week_summary(doctor_id, &week, &config);

    Ok(Json(DoctorScheduleView {
        doctor,
        week: week.to_vec(),
        time_slots: config.slots().to_vec(),
        days,
        summary,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: StatusCounts,
    pub today_appointments: Vec<AppointmentEntry>,
    pub upcoming_appointments: Vec<Appointment>,
    pub recent_patients: Vec<Patient>,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardView>, AppError> {
    let appointment_repo = AppointmentRepository::from_state(&state);
    let patient_repo = PatientRepository::from_state(&state);
    let doctor_repo = DoctorRepository::from_state(&state);
    let (appointments, patients, doctors) = tokio::try_join!(
        appointment_repo.fetch_all(),
        patient_repo.fetch_all(),
        doctor_repo.fetch_all(),
    )
    .map_err(|err| {
        error!("Failed to load dashboard data: {}", err);
        AppError::Store("Failed to load dashboard data. Please try again.".to_string())
    })?;

    let today = Utc::now().date_naive();
    let grid = SlotGrid::new(&appointments);

    let today_appointments = grid
        .day_schedule(today)
        .into_iter()
        .map(|apt| AppointmentEntry::resolve(apt, &patients, &doctors))
        .collect();

    Ok(Json(DashboardView {
        stats: stats::status_counts(&appointments, today),
        today_appointments,
        upcoming_appointments: stats::upcoming_appointments(&appointments, today),
        recent_patients: stats::recent_patients(&patients),
    }))
}
