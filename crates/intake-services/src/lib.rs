//! Intake Services Layer
//!
//! The business service layer: the Airtable record-store client, the lead
//! submission reconciler with its attachment fallback chain, and the upload
//! service that puts the upload gate in front of object storage. Storage types
//! are re-exported so the API crate depends on a single service facade. Keep
//! coordination here; keep thin HTTP handling in intake-api.

pub mod airtable;
pub mod records;
pub mod submission;
pub mod upload;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use airtable::{AirtableClient, AirtableRecord, BaseSummary, FieldSchema, TableSchema};
#[cfg(feature = "storage-firebase")]
pub use intake_storage::FirebaseStorage;
#[cfg(feature = "storage-local")]
pub use intake_storage::LocalStorage;
pub use intake_storage::{create_storage, Storage, StorageBackend, StorageError, StorageResult};
pub use records::{lead_fields, minimal_lead_fields, LeadStore, RecordFields, StoreError, StoreResult};
pub use submission::{
    default_strategies, AttachStrategy, RawPatch, StructuredAttachment, SubmissionReconciler,
    TextAppend,
};
pub use upload::UploadService;
