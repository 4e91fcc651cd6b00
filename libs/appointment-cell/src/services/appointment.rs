use std::sync::Arc;

use tracing::{debug, error};

use shared_models::notify::Notify;
use shared_store::{AppState, FetchQuery, RecordStore, StoreError};

use crate::models::{Appointment, AppointmentInput};

/// CRUD access to the appointment collection. The write path performs no
/// slot-conflict checking: a second booking at an occupied
/// (doctor, date, slot) goes through like any other create.
pub struct AppointmentRepository {
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notify>,
}

impl AppointmentRepository {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notify>) -> Self {
        Self { store, notifier }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.store.clone(), state.notifier.clone())
    }

    pub async fn fetch_all(&self) -> Result<Vec<Appointment>, StoreError> {
        let records = self
            .store
            .fetch_records(
                Appointment::COLLECTION,
                &FetchQuery::for_fields(Appointment::FIELDS),
            )
            .await?;
        Ok(records.iter().filter_map(Appointment::from_record).collect())
    }

    pub async fn get_all(&self) -> Vec<Appointment> {
        match self.fetch_all().await {
            Ok(appointments) => appointments,
            Err(err) => {
                error!("Failed to fetch appointments: {}", err);
                self.notifier
                    .error("Failed to load appointments. Please try again.");
                Vec::new()
            }
        }
    }

    pub async fn get_by_id(&self, id: i64) -> Option<Appointment> {
        match self
            .store
            .get_record_by_id(Appointment::COLLECTION, id, Appointment::FIELDS)
            .await
        {
            Ok(Some(record)) => Appointment::from_record(&record),
            Ok(None) => {
                debug!("Appointment {} not found", id);
                None
            }
            Err(err) => {
                error!("Failed to fetch appointment {}: {}", id, err);
                self.notifier
                    .error("Failed to load appointment. Please try again.");
                None
            }
        }
    }

    pub async fn create(&self, input: &AppointmentInput) -> Option<Appointment> {
        match self
            .store
            .create_record(Appointment::COLLECTION, input.to_store_fields())
            .await
        {
            Ok(record) => match Appointment::from_record(&record) {
                Some(appointment) => {
                    debug!("Appointment created with Id {}", appointment.id);
                    self.notifier.success("Appointment booked successfully!");
                    Some(appointment)
                }
                None => {
                    error!("Store returned an appointment record without an Id");
                    self.notifier
                        .error("Failed to book appointment. Please try again.");
                    None
                }
            },
            Err(err) => {
                self.report_failure("book", err);
                None
            }
        }
    }

    pub async fn update(&self, id: i64, input: &AppointmentInput) -> Option<Appointment> {
        match self
            .store
            .update_record(Appointment::COLLECTION, id, input.to_store_fields())
            .await
        {
            Ok(record) => {
                let appointment = Appointment::from_record(&record);
                if appointment.is_some() {
                    self.notifier.success("Appointment updated successfully!");
                } else {
                    self.notifier
                        .error("Failed to update appointment. Please try again.");
                }
                appointment
            }
            Err(err) => {
                self.report_failure("update", err);
                None
            }
        }
    }

    pub async fn delete(&self, id: i64) -> bool {
        match self.store.delete_record(Appointment::COLLECTION, id).await {
            Ok(true) => {
                self.notifier.success("Appointment cancelled successfully!");
                true
            }
            Ok(false) => {
                self.notifier
                    .error("Failed to cancel appointment. Please try again.");
                false
            }
            Err(err) => {
                error!("Failed to delete appointment {}: {}", id, err);
                self.notifier
                    .error("Failed to cancel appointment. Please try again.");
                false
            }
        }
    }

    fn report_failure(&self, action: &str, err: StoreError) {
        match err {
            StoreError::FieldValidation(errors) => {
                for field_error in errors {
                    error!(
                        "Appointment {} rejected field {}: {}",
                        action, field_error.field, field_error.message
                    );
                    self.notifier.error(&field_error.message);
                }
            }
            other => {
                error!("Failed to {} appointment: {}", action, other);
                self.notifier.error(&format!(
                    "Failed to {} appointment. Please try again.",
                    action
                ));
            }
        }
    }
}
