use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single rejected field from a create/update result, reported to the
/// user individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "fieldLabel", default)]
    pub field: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("record store rejected the request: {0}")]
    Rejected(String),

    #[error("field validation failed: {}", format_field_errors(.0))]
    FieldValidation(Vec<FieldError>),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| {
            if e.field.is_empty() {
                e.message.clone()
            } else {
                format!("{}: {}", e.field, e.message)
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
