use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use patient_cell::models::{BloodType, Gender, Patient, PatientInput};
use patient_cell::services::patient::PatientRepository;
use shared_models::record::RawRecord;
use shared_store::{FetchQuery, InMemoryStore, RecordStore, StoreError};
use shared_utils::test_utils::{CapturingNotifier, Notice, SampleRecords};

fn repository() -> (Arc<InMemoryStore>, Arc<CapturingNotifier>, PatientRepository) {
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(CapturingNotifier::new());
    let repo = PatientRepository::new(store.clone(), notifier.clone());
    (store, notifier, repo)
}

fn sample_input() -> PatientInput {
    PatientInput {
        first_name: "Maeve".to_string(),
        last_name: "Brennan".to_string(),
        date_of_birth: chrono::NaiveDate::from_ymd_opt(1985, 3, 14),
        gender: Gender::parse("female"),
        phone: "555-0101".to_string(),
        email: "maeve.brennan@example.com".to_string(),
        address: "12 Harbour Road".to_string(),
        emergency_contact: Default::default(),
        allergies: vec!["Penicillin".to_string(), "Latex".to_string()],
        blood_type: BloodType::parse("A+"),
    }
}

/// Store double whose every call fails at the transport layer.
struct BrokenStore;

#[async_trait]
impl RecordStore for BrokenStore {
    async fn fetch_records(
        &self,
        _collection: &str,
        _query: &FetchQuery,
    ) -> Result<Vec<RawRecord>, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn get_record_by_id(
        &self,
        _collection: &str,
        _id: i64,
        _fields: &[&str],
    ) -> Result<Option<RawRecord>, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn create_record(
        &self,
        _collection: &str,
        _fields: Map<String, Value>,
    ) -> Result<RawRecord, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn update_record(
        &self,
        _collection: &str,
        _id: i64,
        _fields: Map<String, Value>,
    ) -> Result<RawRecord, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }

    async fn delete_record(&self, _collection: &str, _id: i64) -> Result<bool, StoreError> {
        Err(StoreError::Transport("connection refused".to_string()))
    }
}

#[tokio::test]
async fn get_all_on_empty_collection_returns_empty_vec() {
    let (_store, notifier, repo) = repository();
    let patients = repo.get_all().await;
    assert!(patients.is_empty());
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn get_all_normalizes_external_records_newest_first() {
    let (store, _notifier, repo) = repository();
    store.seed(Patient::COLLECTION, SampleRecords::external_patient("Maeve", "Brennan"));
    store.seed(Patient::COLLECTION, SampleRecords::external_patient("Tomás", "Kelly"));

    let patients = repo.get_all().await;
    assert_eq!(patients.len(), 2);
    // Store order: descending by Id.
    assert_eq!(patients[0].first_name, "Tomás");
    assert_eq!(patients[1].first_name, "Maeve");
    assert_eq!(patients[1].allergies, vec!["Penicillin", "Latex"]);
    assert_eq!(patients[1].emergency_contact.name, "Pat Doyle");
}

#[tokio::test]
async fn get_all_fails_open_on_transport_error() {
    let notifier = Arc::new(CapturingNotifier::new());
    let repo = PatientRepository::new(Arc::new(BrokenStore), notifier.clone());

    let patients = repo.get_all().await;
    assert!(patients.is_empty());
    assert_eq!(
        notifier.errors(),
        vec!["Failed to load patients. Please try again.".to_string()]
    );
}

#[tokio::test]
async fn get_by_id_returns_none_for_missing_and_broken_alike() {
    let (_store, _notifier, repo) = repository();
    assert!(repo.get_by_id(42).await.is_none());

    let notifier = Arc::new(CapturingNotifier::new());
    let broken = PatientRepository::new(Arc::new(BrokenStore), notifier.clone());
    assert!(broken.get_by_id(42).await.is_none());
    assert_eq!(notifier.errors().len(), 1);
}

#[tokio::test]
async fn create_then_get_by_id_round_trips_the_canonical_form() {
    let (_store, notifier, repo) = repository();
    let created = repo.create(&sample_input()).await.expect("created");

    assert_eq!(created.code, format!("PAT{:03}", created.id));
    assert!(created.registration_date.is_some());
    assert_eq!(
        notifier.successes(),
        vec!["Patient registered successfully!".to_string()]
    );

    let fetched = repo.get_by_id(created.id).await.expect("fetched");
    assert_eq!(fetched, created);
    assert_eq!(fetched.allergies, vec!["Penicillin", "Latex"]);
    assert_eq!(fetched.blood_type, Some(BloodType::APositive));
}

#[tokio::test]
async fn update_replaces_the_full_record_and_preserves_registration_date() {
    let (_store, _notifier, repo) = repository();
    let created = repo.create(&sample_input()).await.expect("created");

    let mut replacement = sample_input();
    replacement.phone = "555-9999".to_string();
    let updated = repo.update(created.id, &replacement).await.expect("updated");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.phone, "555-9999");
    // Update never writes the registration date; with full-replace store
    // semantics the stored value is simply gone unless re-supplied.
    assert_eq!(updated.registration_date, None);
}

#[tokio::test]
async fn delete_reports_false_for_missing_records() {
    let (_store, notifier, repo) = repository();
    assert!(!repo.delete(7).await);
    assert_eq!(
        notifier.notices(),
        vec![Notice::Error("Failed to delete patient. Please try again.".to_string())]
    );
}

#[tokio::test]
async fn delete_removes_a_created_patient() {
    let (_store, notifier, repo) = repository();
    let created = repo.create(&sample_input()).await.expect("created");

    assert!(repo.delete(created.id).await);
    assert!(repo.get_by_id(created.id).await.is_none());
    assert!(notifier
        .successes()
        .contains(&"Patient deleted successfully!".to_string()));
}

#[tokio::test]
async fn field_validation_errors_are_notified_individually() {
    struct RejectingStore;

    #[async_trait]
    impl RecordStore for RejectingStore {
        async fn fetch_records(
            &self,
            _collection: &str,
            _query: &FetchQuery,
        ) -> Result<Vec<RawRecord>, StoreError> {
            Ok(Vec::new())
        }

        async fn get_record_by_id(
            &self,
            _collection: &str,
            _id: i64,
            _fields: &[&str],
        ) -> Result<Option<RawRecord>, StoreError> {
            Ok(None)
        }

        async fn create_record(
            &self,
            _collection: &str,
            _fields: Map<String, Value>,
        ) -> Result<RawRecord, StoreError> {
            Err(StoreError::FieldValidation(vec![
                shared_store::FieldError {
                    field: "email_c".to_string(),
                    message: "Invalid email".to_string(),
                },
                shared_store::FieldError {
                    field: "phone_c".to_string(),
                    message: "Phone is required".to_string(),
                },
            ]))
        }

        async fn update_record(
            &self,
            _collection: &str,
            _id: i64,
            _fields: Map<String, Value>,
        ) -> Result<RawRecord, StoreError> {
            Ok(RawRecord::default())
        }

        async fn delete_record(&self, _collection: &str, _id: i64) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    let notifier = Arc::new(CapturingNotifier::new());
    let repo = PatientRepository::new(Arc::new(RejectingStore), notifier.clone());

    assert!(repo.create(&sample_input()).await.is_none());
    assert_eq!(
        notifier.errors(),
        vec!["Invalid email".to_string(), "Phone is required".to_string()]
    );
}
