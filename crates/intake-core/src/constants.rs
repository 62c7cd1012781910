//! Shared constants

/// Default maximum upload size (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Maximum accepted length of the submitter's name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum accepted length of an email address (RFC 5321 path limit).
pub const MAX_EMAIL_LENGTH: usize = 320;

/// Maximum accepted length of the free-text case description.
pub const MAX_CASE_DESCRIPTION_LENGTH: usize = 20_000;

/// Airtable field holding the submitter's name.
pub const FIELD_NAME: &str = "Name";

/// Airtable field holding the submitter's email.
pub const FIELD_EMAIL: &str = "Email";

/// Airtable field holding the case description.
pub const FIELD_CASE_DESCRIPTION: &str = "Case Description";

/// Attachment field name used by the production base.
pub const DEFAULT_ATTACHMENT_FIELD: &str = "Aggrement";

/// Default Airtable REST endpoint.
pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
