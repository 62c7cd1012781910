//! Intake Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! validation shared by every intake component: the lead validator, the
//! upload gate, and the types the submission reconciler reports with.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod storage_types;
pub mod validation;

// Re-export commonly used types
pub use config::{AirtableConfig, Config, StoreFailurePolicy};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    Attachment, AttachStrategyKind, DocumentKind, Lead, LeadSubmission, SubmissionOutcome,
    SubmissionState,
};
pub use storage_types::StorageBackend;
pub use validation::{check_upload, validate_lead, UploadError, ValidationError};
