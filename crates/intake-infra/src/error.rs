//! HTTP error response body
//!
//! The `IntoResponse` implementation for `AppError` lives in intake-api: the
//! orphan rule forbids implementing axum's trait for a core type here.

use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every endpoint. `success` is always `false` so the
/// contact form can branch on one field for both outcomes.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recoverable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
            error_type: None,
            code: None,
            recoverable: None,
            suggested_action: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_body_has_success_false_and_error() {
        let json = serde_json::to_value(ErrorResponse::new("Name is required")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Name is required"})
        );
    }
}
