use std::sync::Arc;

use tracing::{debug, error};

use shared_models::notify::Notify;
use shared_store::{AppState, FetchQuery, RecordStore, StoreError};

use crate::models::{Doctor, DoctorInput};

/// CRUD access to the doctor roster. Same fail-open read contract as the
/// other repositories.
pub struct DoctorRepository {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notify>,
}

impl DoctorRepository {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notify>) -> Self {
        Self { store, notifier }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.notifier.clone())
    }

    pub async fn fetch_all(&self) -> Result<Vec<Doctor>, StoreError> {
        let records = self
            .store
            .fetch_records(Doctor::COLLECTION, &FetchQuery::for_fields(Doctor::FIELDS))
            .await?;
        Ok(records.iter().filter_map(Doctor::from_record).collect())
    }

    pub async fn get_all(&self) -> Vec<Doctor> {
        match self.fetch_all().await {
            Ok(doctors) => doctors,
            Err(err) => {
                error!("Failed to fetch doctors: {}", err);
                self.notifier.error("Failed to load doctors. Please try again.");
                Vec::new()
            }
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Doctor> {
        match self
            .store
            .get_record_by_id(Doctor::COLLECTION, id, Doctor::FIELDS)
            .await
        {
            Ok(Some(record)) => Doctor::from_record(&record),
            Ok(None) => {
                debug!("Doctor {} not found", id);
                None
            }
            Err(err) => {
                error!("Failed to fetch doctor {}: {}", id, err);
                self.notifier.error("Failed to load doctor. Please try again.");
                None
            }
        }
    }

    pub async fn create(&self, input: &DoctorInput) -> Option<Doctor> {
        match self
            .store
            .create_record(Doctor::COLLECTION, input.to_store_fields())
            .await
        {
            Ok(record) => match Doctor::from_record(&record) {
                Some(doctor) => {
                    debug!("Doctor created with Id {}", doctor.id);
                    self.notifier.success("Doctor added successfully!");
                    Some(doctor)
                }
                None => {
                    error!("Store returned a doctor record without an Id");
                    self.notifier.error("Failed to add doctor. Please try again.");
                    None
                }
            },
            Err(err) => {
                self.report_failure("add", err);
                None
            }
        }
    }

    pub async fn update(&self, id: i64, input: &DoctorInput) -> Option<Doctor> {
        match self
            .store
            .update_record(Doctor::COLLECTION, id, input.to_store_fields())
            .await
        {
            Ok(record) => {
                let doctor = Doctor::from_record(&record);
                if doctor.is_some() {
                    self.notifier.success("Schedule updated successfully!");
                } else {
                    self.notifier.error("Failed to update doctor. Please try again.");
                }
                doctor
            }
            Err(err) => {
                self.report_failure("update", err);
                None
            }
        }
    }

    pub async fn delete(&self, id: i64) -> bool {
        match self.store.delete_record(Doctor::COLLECTION, id).await {
            Ok(true) => {
                self.notifier.success("Doctor deleted successfully!");
                true
            }
            Ok(false) => {
                self.notifier.error("Failed to delete doctor. Please try again.");
                false
            }
            Err(err) => {
                error!("Failed to delete doctor {}: {}", id, err);
                self.notifier.error("Failed to delete doctor. Please try again.");
                false
            }
        }
    }

    fn report_failure(&self, action: &str, err: StoreError) {
        match err {
            StoreError::FieldValidation(errors) => {
                for field_error in errors {
                    error!(
                        "Doctor {} rejected field {}: {}",
                        action, field_error.field, field_error.message
                    );
                    self.notifier.error(&field_error.message);
                }
            }
            other => {
                error!("Failed to {} doctor: {}", action, other);
                self.notifier
                    .error(&format!("Failed to {} doctor. Please try again.", action));
            }
        }
    }
}
