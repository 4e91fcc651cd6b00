use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Map, Value};

use shared_models::record::RawRecord;

use crate::error::StoreError;
use crate::query::FetchQuery;
use crate::RecordStore;

/// In-memory record store double. Mirrors the hosted backend's observable
/// semantics: store-assigned integer Ids that are never reused, fetch
/// order descending by `Id`, the page limit applied, and fresh copies
/// returned on every call so callers never alias internal storage.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, Collection>>,
}

#[derive(Default)]
struct Collection {
    next_id: i64,
    records: Vec<Map<String, Value>>,
}

impl Collection {
    fn assign_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn position(&self, id: i64) -> Option<usize> {
        self.records
            .iter()
            .position(|rec| rec.get("Id").and_then(Value::as_i64) == Some(id))
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record directly, returning its assigned `Id`. Test setup
    /// convenience; goes through the same Id assignment as `create_record`.
    pub fn seed(&self, collection: &str, mut fields: Map<String, Value>) -> i64 {
        let mut collections = self.collections.lock().unwrap();
        let entry = collections.entry(collection.to_string()).or_default();
        let id = entry.assign_id();
        fields.insert("Id".to_string(), json!(id));
        entry.records.push(fields);
        id
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn fetch_records(
        &self,
        collection: &str,
        query: &FetchQuery,
    ) -> Result<Vec<RawRecord>, StoreError> {
        let collections = self.collections.lock().unwrap();
        let mut records: Vec<Map<String, Value>> = collections
            .get(collection)
            .map(|entry| entry.records.clone())
            .unwrap_or_default();

        records.sort_by_key(|rec| std::cmp::Reverse(rec.get("Id").and_then(Value::as_i64)));

        Ok(records
            .into_iter()
            .skip(query.paging.offset)
            .take(query.paging.limit)
            .map(RawRecord::new)
            .collect())
    }

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: i64,
        _fields: &[&str],
    ) -> Result<Option<RawRecord>, StoreError> {
        let collections = self.collections.lock().unwrap();
        let record = collections
            .get(collection)
            .and_then(|entry| entry.position(id).map(|idx| entry.records[idx].clone()));
        Ok(record.map(RawRecord::new))
    }

    async fn create_record(
        &self,
        collection: &str,
        mut fields: Map<String, Value>,
    ) -> Result<RawRecord, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let entry = collections.entry(collection.to_string()).or_default();
        let id = entry.assign_id();
        fields.insert("Id".to_string(), json!(id));
        entry.records.push(fields.clone());
        Ok(RawRecord::new(fields))
    }

    async fn update_record(
        &self,
        collection: &str,
        id: i64,
        mut fields: Map<String, Value>,
    ) -> Result<RawRecord, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let entry = collections
            .get_mut(collection)
            .ok_or_else(|| StoreError::Rejected("record not found".to_string()))?;
        let idx = entry
            .position(id)
            .ok_or_else(|| StoreError::Rejected("record not found".to_string()))?;

        // Full-record replacement: submitted fields become the record.
        fields.insert("Id".to_string(), json!(id));
        entry.records[idx] = fields.clone();
        Ok(RawRecord::new(fields))
    }

    async fn delete_record(&self, collection: &str, id: i64) -> Result<bool, StoreError> {
        let mut collections = self.collections.lock().unwrap();
        let entry = match collections.get_mut(collection) {
            Some(entry) => entry,
            None => return Ok(false),
        };
        match entry.position(id) {
            Some(idx) => {
                entry.records.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::FetchQuery;

    #[tokio::test]
    async fn ids_are_assigned_and_never_reused() {
        let store = InMemoryStore::new();
        let first = store
            .create_record("patient_c", Map::new())
            .await
            .unwrap()
            .id()
            .unwrap();
        assert!(store.delete_record("patient_c", first).await.unwrap());

        let second = store
            .create_record("patient_c", Map::new())
            .await
            .unwrap()
            .id()
            .unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn fetch_returns_descending_by_id() {
        let store = InMemoryStore::new();
        for _ in 0..3 {
            store.create_record("doctor_c", Map::new()).await.unwrap();
        }

        let records = store
            .fetch_records("doctor_c", &FetchQuery::for_fields(&["Id"]))
            .await
            .unwrap();
        let ids: Vec<i64> = records.iter().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn fetch_on_missing_collection_is_empty() {
        let store = InMemoryStore::new();
        let records = store
            .fetch_records("appointment_c", &FetchQuery::for_fields(&["Id"]))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn update_replaces_the_full_record() {
        let store = InMemoryStore::new();
        let mut fields = Map::new();
        fields.insert("notes_c".to_string(), json!("original"));
        fields.insert("status_c".to_string(), json!("pending"));
        let id = store
            .create_record("appointment_c", fields)
            .await
            .unwrap()
            .id()
            .unwrap();

        let mut replacement = Map::new();
        replacement.insert("notes_c".to_string(), json!("replaced"));
        store
            .update_record("appointment_c", id, replacement)
            .await
            .unwrap();

        let record = store
            .get_record_by_id("appointment_c", id, &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.str_of(&["notes_c"]), "replaced");
        // Omitted fields are not preserved.
        assert!(record.get(&["status_c"]).is_none());
    }

    #[tokio::test]
    async fn delete_reports_missing_records() {
        let store = InMemoryStore::new();
        assert!(!store.delete_record("patient_c", 99).await.unwrap());
    }
}
