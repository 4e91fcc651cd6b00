use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use async_trait::async_trait;
use shared_config::AppConfig;
use shared_models::record::RawRecord;

use crate::error::{FieldError, StoreError};
use crate::query::FetchQuery;
use crate::RecordStore;

/// HTTP client for the hosted record store. Every response arrives in an
/// envelope: list reads as `{success, data[], message}`, single reads as
/// `{success, data, message}`, mutations as `{success, results[], message}`
/// with one result per submitted record.
pub struct HostedRecordStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ListEnvelope {
    success: bool,
    #[serde(default)]
    data: Vec<Value>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct RecordEnvelope {
    success: bool,
    data: Option<Value>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct MutationEnvelope {
    success: bool,
    #[serde(default)]
    results: Vec<MutationResult>,
    message: Option<String>,
}

#[derive(Deserialize)]
struct MutationResult {
    success: bool,
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<FieldError>,
    message: Option<String>,
}

impl HostedRecordStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.record_store_url.clone(),
            api_key: config.record_store_api_key.clone(),
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        headers
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, StoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Record store request: {} {}", method, url);

        let mut req = self.client.request(method, &url).headers(self.headers());
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;
        Ok(response)
    }

    async fn read_failure(response: reqwest::Response) -> StoreError {
        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        error!("Record store error ({}): {}", status, detail);
        StoreError::Transport(format!("{}: {}", status, detail))
    }

    fn mutation_outcome(envelope: MutationEnvelope) -> Result<RawRecord, StoreError> {
        if !envelope.success {
            return Err(StoreError::Rejected(
                envelope.message.unwrap_or_else(|| "request failed".to_string()),
            ));
        }

        let result = envelope
            .results
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::Rejected("empty result set".to_string()))?;

        if result.success {
            let data = result
                .data
                .ok_or_else(|| StoreError::Rejected("result carried no record".to_string()))?;
            return Ok(RawRecord::from_value(data));
        }

        if !result.errors.is_empty() {
            return Err(StoreError::FieldValidation(result.errors));
        }

        Err(StoreError::Rejected(
            result.message.unwrap_or_else(|| "record rejected".to_string()),
        ))
    }
}

#[async_trait]
impl RecordStore for HostedRecordStore {
    async fn fetch_records(
        &self,
        collection: &str,
        query: &FetchQuery,
    ) -> Result<Vec<RawRecord>, StoreError> {
        let path = format!("/api/records/{}/fetch", collection);
        let response = self
            .request(Method::POST, &path, Some(serde_json::to_value(query).unwrap_or(Value::Null)))
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let envelope: ListEnvelope = response.json().await?;
        if !envelope.success {
            return Err(StoreError::Rejected(
                envelope.message.unwrap_or_else(|| "fetch failed".to_string()),
            ));
        }

        Ok(envelope.data.into_iter().map(RawRecord::from_value).collect())
    }

    async fn get_record_by_id(
        &self,
        collection: &str,
        id: i64,
        fields: &[&str],
    ) -> Result<Option<RawRecord>, StoreError> {
        let path = format!(
            "/api/records/{}/{}?fields={}",
            collection,
            id,
            fields.join(",")
        );
        let response = self.request(Method::GET, &path, None).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let envelope: RecordEnvelope = response.json().await?;
        if !envelope.success {
            debug!(
                "Record {}/{} not returned: {}",
                collection,
                id,
                envelope.message.unwrap_or_default()
            );
            return Ok(None);
        }

        Ok(envelope.data.map(RawRecord::from_value))
    }

    async fn create_record(
        &self,
        collection: &str,
        fields: Map<String, Value>,
    ) -> Result<RawRecord, StoreError> {
        let path = format!("/api/records/{}", collection);
        let body = json!({ "records": [Value::Object(fields)] });
        let response = self.request(Method::POST, &path, Some(body)).await?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        Self::mutation_outcome(response.json().await?)
    }

    async fn update_record(
        &self,
        collection: &str,
        id: i64,
        mut fields: Map<String, Value>,
    ) -> Result<RawRecord, StoreError> {
        fields.insert("Id".to_string(), json!(id));
        let path = format!("/api/records/{}", collection);
        let body = json!({ "records": [Value::Object(fields)] });
        let response = self.request(Method::PATCH, &path, Some(body)).await?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        Self::mutation_outcome(response.json().await?)
    }

    async fn delete_record(&self, collection: &str, id: i64) -> Result<bool, StoreError> {
        let path = format!("/api/records/{}", collection);
        let body = json!({ "RecordIds": [id] });
        let response = self.request(Method::DELETE, &path, Some(body)).await?;

        if !response.status().is_success() {
            return Err(Self::read_failure(response).await);
        }

        let envelope: MutationEnvelope = response.json().await?;
        let confirmed = envelope.success
            && envelope
                .results
                .first()
                .map(|result| result.success)
                .unwrap_or(false);
        Ok(confirmed)
    }
}
