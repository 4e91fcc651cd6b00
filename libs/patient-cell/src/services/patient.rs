use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, error};

use shared_models::notify::Notify;
use shared_store::{AppState, FetchQuery, RecordStore, StoreError};

use crate::models::{Patient, PatientInput};

/// CRUD access to the patient collection. Read paths fail open: callers
/// get an empty result or `None`, never a transport error.
pub struct PatientRepository {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notify>,
}

impl PatientRepository {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notify>) -> Self {
        Self { store, notifier }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.notifier.clone())
    }

    /// Fallible list read, used by joint page loads so a single failure
    /// can fail the whole load.
    pub async fn fetch_all(&self) -> Result<Vec<Patient>, StoreError> {
        let records = self
            .store
            .fetch_records(Patient::COLLECTION, &FetchQuery::for_fields(Patient::FIELDS))
            .await?;
        Ok(records.iter().filter_map(Patient::from_record).collect())
    }

    pub async fn get_all(&self) -> Vec<Patient> {
        match self.fetch_all().await {
            Ok(patients) => patients,
            Err(err) => {
                error!("Failed to fetch patients: {}", err);
                self.notifier.error("Failed to load patients. Please try again.");
                Vec::new()
            }
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Patient> {
        match self
            .store
            .get_record_by_id(Patient::COLLECTION, id, Patient::FIELDS)
            .await
        {
            Ok(Some(record)) => Patient::from_record(&record),
            Ok(None) => {
                debug!("Patient {} not found", id);
                None
            }
            Err(err) => {
                error!("Failed to fetch patient {}: {}", id, err);
                self.notifier.error("Failed to load patient. Please try again.");
                None
            }
        }
    }

    pub async fn create(&self, input: &PatientInput) -> Option<Patient> {
        let mut fields = input.to_store_fields();
        // Registration date is stamped here once; update never writes it.
        fields.insert(
            "registration_date_c".to_string(),
            json!(Utc::now().date_naive().format("%Y-%m-%d").to_string()),
        );

        match self.store.create_record(Patient::COLLECTION, fields).await {
            Ok(record) => {
                let patient = Patient::from_record(&record);
                match patient {
                    Some(patient) => {
                        debug!("Patient created with Id {}", patient.id);
                        self.notifier.success("Patient registered successfully!");
                        Some(patient)
                    }
                    None => {
                        error!("Store returned a patient record without an Id");
                        self.notifier.error("Failed to register patient. Please try again.");
                        None
                    }
                }
            }
            Err(err) => {
                self.report_failure("register", err);
                None
            }
        }
    }

    /// Full-record replacement: every mapped field is written; callers
    /// merge with the prior record before calling.
    pub async fn update(&self, id: i64, input: &PatientInput) -> Option<Patient> {
        let fields = input.to_store_fields();
        match self.store.update_record(Patient::COLLECTION, id, fields).await {
            Ok(record) => {
                let patient = Patient::from_record(&record);
                if patient.is_some() {
                    self.notifier.success("Patient updated successfully!");
                } else {
                    self.notifier.error("Failed to update patient. Please try again.");
                }
                patient
            }
            Err(err) => {
                self.report_failure("update", err);
                None
            }
        }
    }

    pub async fn delete(&self, id: i64) -> bool {
        match self.store.delete_record(Patient::COLLECTION, id).await {
            Ok(true) => {
                self.notifier.success("Patient deleted successfully!");
                true
            }
            Ok(false) => {
                self.notifier.error("Failed to delete patient. Please try again.");
                false
            }
            Err(err) => {
                error!("Failed to delete patient {}: {}", id, err);
                self.notifier.error("Failed to delete patient. Please try again.");
                false
            }
        }
    }

    fn report_failure(&self, action: &str, err: StoreError) {
        match err {
            StoreError::FieldValidation(errors) => {
                // Each rejected field is surfaced to the user individually.
                for field_error in errors {
                    error!(
                        "Patient {} rejected field {}: {}",
                        action, field_error.field, field_error.message
                    );
                    self.notifier.error(&field_error.message);
                }
            }
            other => {
                error!("Failed to {} patient: {}", action, other);
                self.notifier
                    .error(&format!("Failed to {} patient. Please try again.", action));
            }
        }
    }
}
