use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use appointment_cell::models::{Appointment, AppointmentInput, AppointmentStatus};
use appointment_cell::services::appointment::AppointmentRepository;
use shared_store::InMemoryStore;
use shared_utils::test_utils::{CapturingNotifier, SampleRecords};

fn repository() -> (Arc<InMemoryStore>, Arc<CapturingNotifier>, AppointmentRepository) {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(CapturingNotifier::new());
    let repo = AppointmentRepository::new(store.clone(), notifier.clone());
    (store, notifier, repo)
}

fn booking(patient_id: i64, doctor_id: i64, date: &str, slot: &str) -> AppointmentInput {
    AppointmentInput {
        patient_id: json!(patient_id),
        doctor_id: json!(doctor_id),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        time_slot: slot.to_string(),
        duration: json!(30),
        appointment_type: "Consultation".to_string(),
        status: "pending".to_string(),
        notes: String::new(),
    }
}

#[tokio::test]
async fn create_then_get_by_id_round_trips() {
    let (_store, notifier, repo) = repository();
    let created = repo
        .create(&booking(4, 2, "2024-06-10", "09:00"))
        .await
        .expect("created");

    let fetched = repo.get_by_id(created.id).await.expect("fetched");
    assert_eq!(fetched, created);
    assert_eq!(fetched.patient_id, 4);
    assert_eq!(fetched.time_slot, "09:00");
    assert_eq!(fetched.status, AppointmentStatus::Pending);
    assert_eq!(
        notifier.successes(),
        vec!["Appointment booked successfully!".to_string()]
    );
}

#[tokio::test]
async fn string_ids_from_the_form_are_coerced_to_integers() {
    let (_store, _notifier, repo) = repository();
    let mut input = booking(0, 0, "2024-06-10", "10:30");
    input.patient_id = json!("4");
    input.doctor_id = json!("2");
    input.duration = json!("45");

    let created = repo.create(&input).await.expect("created");
    assert_eq!(created.patient_id, 4);
    assert_eq!(created.doctor_id, 2);
    assert_eq!(created.duration, 45);
}

#[tokio::test]
async fn double_booking_the_same_slot_succeeds_without_error() {
    let (_store, _notifier, repo) = repository();
    let first = repo
        .create(&booking(4, 2, "2024-06-10", "09:00"))
        .await
        .expect("first booking");
    let second = repo
        .create(&booking(5, 2, "2024-06-10", "09:00"))
        .await
        .expect("second booking at the same slot");

    assert_ne!(first.id, second.id);

    let all = repo.get_all().await;
    let occupied: Vec<&Appointment> = all
        .iter()
        .filter(|apt| apt.doctor_id == 2 && apt.time_slot == "09:00")
        .collect();
    assert_eq!(occupied.len(), 2);
}

#[tokio::test]
async fn dangling_references_are_tolerated_at_read_time() {
    let (store, _notifier, repo) = repository();
    store.seed(
        Appointment::COLLECTION,
        SampleRecords::external_appointment(999, 888, "2024-06-10", "11:00"),
    );

    let all = repo.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].patient_id, 999);
}

#[tokio::test]
async fn update_is_full_record_replacement() {
    let (_store, _notifier, repo) = repository();
    let created = repo
        .create(&booking(4, 2, "2024-06-10", "09:00"))
        .await
        .expect("created");

    let mut rescheduled = booking(4, 2, "2024-06-11", "14:00");
    rescheduled.status = "confirmed".to_string();
    let updated = repo.update(created.id, &rescheduled).await.expect("updated");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.date, NaiveDate::from_ymd_opt(2024, 6, 11));
    assert_eq!(updated.time_slot, "14:00");
    assert_eq!(updated.status, AppointmentStatus::Confirmed);
}

#[tokio::test]
async fn delete_frees_the_slot() {
    let (_store, notifier, repo) = repository();
    let created = repo
        .create(&booking(4, 2, "2024-06-10", "09:00"))
        .await
        .expect("created");

    assert!(repo.delete(created.id).await);
    assert!(repo.get_all().await.is_empty());
    assert!(notifier
        .successes()
        .contains(&"Appointment cancelled successfully!".to_string()));
}
