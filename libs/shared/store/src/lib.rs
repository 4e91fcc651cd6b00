use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use shared_models::notify::Notify;
use shared_models::record::RawRecord;

pub mod client;
pub mod error;
pub mod memory;
pub mod query;

pub use client::HostedRecordStore;
pub use error::{FieldError, StoreError};
pub use memory::InMemoryStore;
pub use query::{FetchQuery, OrderBy, PagingInfo};

/// The record store as seen by the repositories: a keyed CRUD collaborator
/// serving raw records. Implemented by the hosted HTTP backend and by an
/// in-memory double, so repository logic runs against either without
/// branching.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn fetch_records(
        &self,
        collection: &str,
        query: &FetchQuery,
    ) -> Result<Vec<RawRecord>, StoreError>;

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Option<RawRecord>, StoreError>;

    /// Submits exactly one record; the store assigns `Id`.
    async fn create_record(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<RawRecord, StoreError>;

    /// Full-record replacement keyed by `Id`.
    async fn update_record(
        &self,
        collection: &str,
        id: i64,
        fields: Map<String, Value>,
    ) -> Result<RawRecord, StoreError>;

    /// `Ok(true)` only on confirmed single-record deletion; `Ok(false)`
    /// when the record was not found.
    async fn delete_record(&self, collection: &str, id: i64) -> Result<bool, StoreError>;
}

/// Shared handler state: the storage backend plus the notification
/// channel, both behind trait objects so tests can swap either.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub notifier: Arc<dyn Notify>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notify>) -> Arc<Self> {
        Arc::new(Self { store, notifier })
    }
}
