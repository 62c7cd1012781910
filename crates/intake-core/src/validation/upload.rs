//! Upload gate: the type and size allowlist every file must pass before it
//! reaches object storage or is referenced by a lead.

use thiserror::Error;

use crate::models::DocumentKind;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No file provided")]
    NoFile,

    #[error("Invalid file type. Please upload PDF, DOC, DOCX, TXT, JPG, or PNG files only.")]
    UnsupportedType { content_type: String },

    #[error("File size exceeds the {}MB limit", .max / 1024 / 1024)]
    TooLarge { size: u64, max: u64 },

    #[error("Invalid file reference: {0}")]
    InvalidReference(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

/// Check a file against the allowlist. Returns the resolved document kind.
///
/// Type is checked before size so a disallowed file is reported as such
/// regardless of how large it is.
pub fn check_upload(
    content_type: &str,
    size: u64,
    max_bytes: u64,
) -> Result<DocumentKind, UploadError> {
    let kind = DocumentKind::from_mime_type(content_type).ok_or_else(|| {
        UploadError::UnsupportedType {
            content_type: content_type.to_string(),
        }
    })?;

    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            max: max_bytes,
        });
    }

    Ok(kind)
}

/// Human-readable size for logs, e.g. `"12.50 KB"`.
pub fn format_size_kb(size: u64) -> String {
    format!("{:.2} KB", size as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_MAX_UPLOAD_BYTES;

    const MAX: u64 = DEFAULT_MAX_UPLOAD_BYTES as u64;

    #[test]
    fn accepts_every_allowlisted_type() {
        for kind in DocumentKind::ALL {
            assert_eq!(check_upload(kind.mime_type(), 1024, MAX), Ok(kind));
        }
    }

    #[test]
    fn rejects_zip() {
        let err = check_upload("application/zip", 1024, MAX).unwrap_err();
        assert!(matches!(err, UploadError::UnsupportedType { .. }));
    }

    #[test]
    fn rejects_eleven_mebibytes() {
        let err = check_upload("application/pdf", 11 * 1024 * 1024, MAX).unwrap_err();
        assert_eq!(
            err,
            UploadError::TooLarge {
                size: 11 * 1024 * 1024,
                max: MAX
            }
        );
        assert_eq!(err.to_string(), "File size exceeds the 10MB limit");
    }

    #[test]
    fn accepts_exactly_the_limit() {
        assert!(check_upload("image/png", MAX, MAX).is_ok());
        assert!(check_upload("image/png", MAX + 1, MAX).is_err());
    }

    #[test]
    fn content_type_parameters_do_not_bypass_the_allowlist() {
        assert!(check_upload("application/zip; name=x.pdf", 10, MAX).is_err());
        assert_eq!(
            check_upload("text/plain; charset=utf-8", 10, MAX),
            Ok(DocumentKind::Txt)
        );
    }

    #[test]
    fn formats_size_in_kilobytes() {
        assert_eq!(format_size_kb(12_800), "12.50 KB");
    }
}
