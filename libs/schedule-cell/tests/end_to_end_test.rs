use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use appointment_cell::models::AppointmentInput;
use appointment_cell::services::appointment::AppointmentRepository;
use doctor_cell::models::Doctor;
use doctor_cell::services::doctor::DoctorRepository;
use patient_cell::models::Patient;
use patient_cell::services::patient::PatientRepository;
use schedule_cell::services::grid::SlotGrid;
use shared_store::InMemoryStore;
use shared_utils::test_utils::{CapturingNotifier, SampleRecords};

/// The full lifecycle across cells: an externally-shaped patient
/// normalizes, a booking occupies its slot on the grid, and deleting the
/// booking frees it again.
#[tokio::test]
async fn booking_lifecycle_drives_slot_availability() {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(CapturingNotifier::new());

    let patients = PatientRepository::new(store.clone(), notifier.clone());
    let doctors = DoctorRepository::new(store.clone(), notifier.clone());
    let appointments = AppointmentRepository::new(store.clone(), notifier.clone());

    // Patient arrives in the external shape with a joined allergies string.
    let patient_id = store.seed(
        Patient::COLLECTION,
        SampleRecords::external_patient("Maeve", "Brennan"),
    );
    let patient = patients.get_by_id(patient_id).await.expect("patient");
    assert_eq!(patient.allergies, vec!["Penicillin", "Latex"]);

    let doctor_id = store.seed(
        Doctor::COLLECTION,
        SampleRecords::external_doctor("Sarah Johnson", "Cardiology"),
    );
    let doctor = doctors.get_by_id(doctor_id).await.expect("doctor");

    let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let booked = appointments
        .create(&AppointmentInput {
            patient_id: json!(patient.id),
            doctor_id: json!(doctor.id),
            date: Some(day),
            time_slot: "09:00".to_string(),
            duration: json!(doctor.appointment_duration),
            appointment_type: "Consultation".to_string(),
            status: "confirmed".to_string(),
            notes: String::new(),
        })
        .await
        .expect("booked");

    let loaded = appointments.get_all().await;
    let grid = SlotGrid::new(&loaded);
    assert!(!grid.is_available(doctor.id, day, "09:00"));
    assert!(grid.is_available(doctor.id, day, "09:30"));

    // Deleting the appointment reverts availability.
    assert!(appointments.delete(booked.id).await);
    let reloaded = appointments.get_all().await;
    let grid = SlotGrid::new(&reloaded);
    assert!(grid.is_available(doctor.id, day, "09:00"));
}
