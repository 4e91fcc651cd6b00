use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, error};

use shared_models::notify::Notify;
use shared_store::{AppState, FetchQuery, RecordStore, StoreError};

use crate::models::{MedicalRecord, MedicalRecordInput};

pub struct MedicalRecordRepository {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notify>,
}

impl MedicalRecordRepository {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notify>) -> Self {
        Self { store, notifier }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.notifier.clone())
    }

    pub async fn fetch_all(&self) -> Result<Vec<MedicalRecord>, StoreError> {
        let records = self
            .store
            .fetch_records(
                MedicalRecord::COLLECTION,
                &FetchQuery::for_fields(MedicalRecord::FIELDS),
            )
            .await?;
        Ok(records
            .iter()
            .filter_map(MedicalRecord::from_record)
            .collect())
    }

    pub async fn get_all(&self) -> Vec<MedicalRecord> {
        match self.fetch_all().await {
            Ok(records) => records,
            Err(err) => {
                error!("Failed to fetch medical records: {}", err);
                self.notifier
                    .error("Failed to load medical records. Please try again.");
                Vec::new()
            }
        }
    }

    /// All records for one patient, filtered on the numeric form of the
    /// relationship over the loaded list.
    pub async fn get_by_patient(&self, patient_id: i64) -> Vec<MedicalRecord> {
        self.get_all()
            .await
            .into_iter()
            .filter(|record| record.patient_id == patient_id)
            .collect()
    }

    pub async fn get_by_id(&self, id: i64) -> Option<MedicalRecord> {
        match self
            .store
            .get_record_by_id(MedicalRecord::COLLECTION, id, MedicalRecord::FIELDS)
            .await
        {
            Ok(Some(record)) => MedicalRecord::from_record(&record),
            Ok(None) => {
                debug!("Medical record {} not found", id);
                None
            }
            Err(err) => {
                error!("Failed to fetch medical record {}: {}", id, err);
                self.notifier
                    .error("Failed to load medical record. Please try again.");
                None
            }
        }
    }

    pub async fn create(&self, input: &MedicalRecordInput) -> Option<MedicalRecord> {
        let mut fields = input.to_store_fields();
        // Visit date defaults to today when the form omits it.
        if input.visit_date.is_none() {
            fields.insert(
                "visit_date_c".to_string(),
                json!(Utc::now().date_naive().format("%Y-%m-%d").to_string()),
            );
        }

        match self
            .store
            .create_record(MedicalRecord::COLLECTION, fields)
            .await
        {
            Ok(record) => match MedicalRecord::from_record(&record) {
                Some(created) => {
                    debug!("Medical record created with Id {}", created.id);
                    self.notifier.success("Medical record added successfully!");
                    Some(created)
                }
                None => {
                    error!("Store returned a medical record without an Id");
                    self.notifier
                        .error("Failed to add medical record. Please try again.");
                    None
                }
            },
            Err(err) => {
                self.report_failure("add", err);
                None
            }
        }
    }

    pub async fn update(&self, id: i64, input: &MedicalRecordInput) -> Option<MedicalRecord> {
        match self
            .store
            .update_record(MedicalRecord::COLLECTION, id, input.to_store_fields())
            .await
        {
            Ok(record) => {
                let updated = MedicalRecord::from_record(&record);
                if updated.is_some() {
                    self.notifier.success("Medical record updated successfully!");
                } else {
                    self.notifier
                        .error("Failed to update medical record. Please try again.");
                }
                updated
            }
            Err(err) => {
                self.report_failure("update", err);
                None
            }
        }
    }

    pub async fn delete(&self, id: i64) -> bool {
        match self
            .store
            .delete_record(MedicalRecord::COLLECTION, id)
            .await
        {
            Ok(true) => {
                self.notifier.success("Medical record deleted successfully!");
                true
            }
            Ok(false) => {
                self.notifier
                    .error("Failed to delete medical record. Please try again.");
                false
            }
            Err(err) => {
                error!("Failed to delete medical record {}: {}", id, err);
                self.notifier
                    .error("Failed to delete medical record. Please try again.");
                false
            }
        }
    }

    fn report_failure(&self, action: &str, err: StoreError) {
        match err {
            StoreError::FieldValidation(errors) => {
                for field_error in errors {
                    error!(
                        "Medical record {} rejected field {}: {}",
                        action, field_error.field, field_error.message
                    );
                    self.notifier.error(&field_error.message);
                }
            }
            other => {
                error!("Failed to {} medical record: {}", action, other);
                self.notifier.error(&format!(
                    "Failed to {} medical record. Please try again.",
                    action
                ));
            }
        }
    }
}
