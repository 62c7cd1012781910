//! Record store abstraction
//!
//! `LeadStore` is the seam between the submission reconciler and the vendor
//! client. Production wires in `AirtableClient`; tests inject
//! `test_helpers::MockLeadStore`.

use async_trait::async_trait;
use intake_core::constants::{FIELD_CASE_DESCRIPTION, FIELD_EMAIL, FIELD_NAME};
use intake_core::{AppError, Lead};
use serde_json::{Map, Value};
use thiserror::Error;

/// Field name to value map sent to the store.
pub type RecordFields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record store rejected the credentials")]
    Unauthorized,

    #[error("Record store rate limit exceeded")]
    RateLimited,

    #[error("Record store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response from record store: {0}")]
    InvalidResponse(String),

    #[error("Record store configuration error: {0}")]
    Config(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Map a non-success HTTP status to a store error.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => StoreError::Unauthorized,
            429 => StoreError::RateLimited,
            _ => StoreError::Api { status, message },
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StoreError::RateLimited)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::RateLimited => AppError::RateLimited(err.to_string()),
            other => AppError::Store(other.to_string()),
        }
    }
}

/// Operations the reconciler needs from a record store.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Create a record and return its id.
    async fn create(&self, fields: RecordFields) -> StoreResult<String>;

    /// Update fields of an existing record through the typed client path.
    async fn update(&self, record_id: &str, fields: RecordFields) -> StoreResult<()>;

    /// Update fields with a hand-built PATCH request, bypassing the typed path.
    async fn patch_raw(&self, record_id: &str, fields: RecordFields) -> StoreResult<()>;

    /// Reachability check used by the health endpoint.
    async fn check_connectivity(&self) -> StoreResult<()>;
}

/// The three fields every lead record starts with. `Case Description` is an
/// empty string when the lead has none.
pub fn lead_fields(lead: &Lead) -> RecordFields {
    let mut fields = Map::new();
    fields.insert(FIELD_NAME.to_string(), Value::String(lead.name.clone()));
    fields.insert(FIELD_EMAIL.to_string(), Value::String(lead.email.clone()));
    fields.insert(
        FIELD_CASE_DESCRIPTION.to_string(),
        Value::String(lead.description_or_empty().to_string()),
    );
    fields
}

/// Fields for the retry after a failed create: same three fields, with the
/// attachment reference folded into the description.
pub fn minimal_lead_fields(lead: &Lead) -> RecordFields {
    let mut fields = lead_fields(lead);
    fields.insert(
        FIELD_CASE_DESCRIPTION.to_string(),
        Value::String(lead.description_with_attachment_text()),
    );
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{Attachment, DocumentKind};

    fn lead(description: Option<&str>, with_file: bool) -> Lead {
        Lead {
            name: "A".to_string(),
            email: "a@b.co".to_string(),
            case_description: description.map(String::from),
            attachment: with_file.then(|| Attachment {
                url: "https://files.example.com/leads/1_x.pdf".to_string(),
                file_name: "x.pdf".to_string(),
                kind: DocumentKind::Pdf,
                size_bytes: None,
            }),
        }
    }

    #[test]
    fn status_mapping() {
        assert_eq!(StoreError::from_status(401, String::new()), StoreError::Unauthorized);
        assert_eq!(StoreError::from_status(403, String::new()), StoreError::Unauthorized);
        assert_eq!(StoreError::from_status(429, String::new()), StoreError::RateLimited);
        assert_eq!(
            StoreError::from_status(422, "bad field".to_string()),
            StoreError::Api {
                status: 422,
                message: "bad field".to_string()
            }
        );
    }

    #[test]
    fn lead_fields_are_exactly_three() {
        let fields = lead_fields(&lead(Some("x"), true));
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["Name"], "A");
        assert_eq!(fields["Email"], "a@b.co");
        assert_eq!(fields["Case Description"], "x");
    }

    #[test]
    fn absent_description_is_empty_string() {
        let fields = lead_fields(&lead(None, false));
        assert_eq!(fields["Case Description"], "");
    }

    #[test]
    fn minimal_fields_embed_file_reference() {
        let fields = minimal_lead_fields(&lead(Some("x"), true));
        assert_eq!(fields.len(), 3);
        assert_eq!(
            fields["Case Description"],
            "x\n\nFile: x.pdf\nURL: https://files.example.com/leads/1_x.pdf"
        );
    }

    #[test]
    fn rate_limited_converts_to_rate_limited_app_error() {
        let err: AppError = StoreError::RateLimited.into();
        assert!(matches!(err, AppError::RateLimited(_)));
        let err: AppError = StoreError::Network("reset".to_string()).into();
        assert!(matches!(err, AppError::Store(_)));
    }
}
