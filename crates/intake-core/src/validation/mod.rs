//! Validation modules

pub mod lead;
pub mod upload;

pub use lead::{is_valid_email, validate_lead, ValidationError};
pub use upload::{check_upload, format_size_kb, UploadError};
