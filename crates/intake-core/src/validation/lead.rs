//! Lead validation: turns raw form fields into a `Lead` or says exactly which
//! field is wrong. Pure; performs no I/O.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use super::upload::{check_upload, UploadError};
use crate::constants::{MAX_CASE_DESCRIPTION_LENGTH, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH};
use crate::models::{Attachment, DocumentKind, Lead, LeadSubmission};

/// local-part "@" domain "." tld, no whitespace. No DNS or mailbox checks.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required")]
    MissingName,

    #[error("Email is required")]
    MissingEmail,

    #[error("Email address is not valid")]
    InvalidEmailFormat,

    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error(transparent)]
    InvalidAttachment(#[from] UploadError),
}

/// Validate a submission.
///
/// Name and email are checked first, in that order, so a submission missing
/// both reports `MissingName`. A referenced file must pass the upload gate;
/// its type comes from `fileType` when present, otherwise from the file
/// name's extension.
pub fn validate_lead(
    submission: &LeadSubmission,
    max_upload_bytes: u64,
) -> Result<Lead, ValidationError> {
    let name = non_blank(submission.name.as_deref()).ok_or(ValidationError::MissingName)?;
    let email = non_blank(submission.email.as_deref()).ok_or(ValidationError::MissingEmail)?;

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::FieldTooLong {
            field: "name",
            max: MAX_NAME_LENGTH,
        });
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::FieldTooLong {
            field: "email",
            max: MAX_EMAIL_LENGTH,
        });
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    let case_description = match submission.case_description.as_deref() {
        Some(text) if !text.trim().is_empty() => {
            if text.chars().count() > MAX_CASE_DESCRIPTION_LENGTH {
                return Err(ValidationError::FieldTooLong {
                    field: "caseDescription",
                    max: MAX_CASE_DESCRIPTION_LENGTH,
                });
            }
            Some(text.to_string())
        }
        _ => None,
    };

    let attachment = build_attachment(submission, max_upload_bytes)?;

    Ok(Lead {
        name: name.to_string(),
        email: email.to_string(),
        case_description,
        attachment,
    })
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Build the attachment reference, if any. A `fileName` without a `fileUrl`
/// carries nothing to attach and is ignored.
fn build_attachment(
    submission: &LeadSubmission,
    max_upload_bytes: u64,
) -> Result<Option<Attachment>, UploadError> {
    let Some(url) = non_blank(submission.file_url.as_deref()) else {
        return Ok(None);
    };

    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(UploadError::InvalidReference(
            "fileUrl must be an http(s) URL".to_string(),
        ));
    }

    let file_name = non_blank(submission.file_name.as_deref())
        .map(str::to_string)
        .or_else(|| file_name_from_url(url))
        .ok_or_else(|| UploadError::InvalidReference("fileName is required".to_string()))?;

    let kind = match non_blank(submission.file_type.as_deref()) {
        Some(content_type) => check_upload(
            content_type,
            submission.file_size.unwrap_or(0),
            max_upload_bytes,
        )?,
        None => {
            let kind = DocumentKind::from_file_name(&file_name).ok_or_else(|| {
                UploadError::UnsupportedType {
                    content_type: file_name.clone(),
                }
            })?;
            if let Some(size) = submission.file_size {
                check_upload(kind.mime_type(), size, max_upload_bytes)?;
            }
            kind
        }
    };

    Ok(Some(Attachment {
        url: url.to_string(),
        file_name,
        kind,
        size_bytes: submission.file_size,
    }))
}

/// Last path segment of a URL, without query or fragment.
fn file_name_from_url(url: &str) -> Option<String> {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    without_query
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty() && !segment.contains(':'))
        .map(str::to_string)
}
