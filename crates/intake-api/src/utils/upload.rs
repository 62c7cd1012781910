//! Multipart helpers for the upload handler

use axum::extract::Multipart;
use intake_core::{AppError, DocumentKind, UploadError};

const FILE_FIELD: &str = "file";
const MAX_FILENAME_LENGTH: usize = 255;

/// A file pulled out of a multipart form, not yet checked by the upload gate.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Extract the single field named `file`.
///
/// A missing or generic (`application/octet-stream`) content type is inferred
/// from the file name's extension, so browsers that omit it are not rejected
/// for an allowed document.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidInput(
                "Multiple file fields are not allowed; send exactly one field named 'file'"
                    .to_string(),
            ));
        }

        let file_name = field.file_name().unwrap_or("file").to_string();
        let content_type = field.content_type().map(str::to_string);

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        file = Some(UploadedFile {
            content_type: resolve_content_type(content_type.as_deref(), &file_name),
            file_name,
            data: data.to_vec(),
        });
    }

    file.ok_or(AppError::Upload(UploadError::NoFile))
}

fn resolve_content_type(declared: Option<&str>, file_name: &str) -> String {
    match declared {
        Some(ct) if !ct.trim().is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => DocumentKind::from_file_name(file_name)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}

/// Strip directories and unusual characters from a client-supplied file name.
/// Rejects names that still contain `..`.
pub fn sanitize_filename(filename: &str) -> Result<String, AppError> {
    let filename_only = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let traverses = filename.split(['/', '\\']).any(|part| part == "..");
    if traverses || filename_only.contains("..") {
        return Err(AppError::InvalidInput(
            "Filename contains invalid path traversal".to_string(),
        ));
    }

    let sanitized: String = filename_only
        .chars()
        .take(MAX_FILENAME_LENGTH)
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        return Ok("file".to_string());
    }

    Ok(sanitized)
}
