//! Upload service: the upload gate in front of object storage.

use intake_core::models::UploadResponse;
use intake_core::validation::format_size_kb;
use intake_core::{check_upload, UploadError};
use intake_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn Storage>,
    max_upload_bytes: u64,
}

impl UploadService {
    pub fn new(storage: Arc<dyn Storage>, max_upload_bytes: u64) -> Self {
        Self {
            storage,
            max_upload_bytes,
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes
    }

    /// Check the file against the gate and store it. Nothing reaches storage
    /// unless the gate passes.
    pub async fn store_file(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<UploadResponse, UploadError> {
        if data.is_empty() {
            return Err(UploadError::NoFile);
        }

        let size = data.len() as u64;
        let kind = check_upload(content_type, size, self.max_upload_bytes)?;

        let (key, url) = self
            .storage
            .upload(file_name, kind.mime_type(), data)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, file_name = %file_name, "Storage upload failed");
                UploadError::Storage(e.to_string())
            })?;

        tracing::info!(
            key = %key,
            file_name = %file_name,
            file_type = %kind.mime_type(),
            size = %format_size_kb(size),
            backend = %self.storage.backend_type(),
            "File uploaded"
        );

        Ok(UploadResponse {
            success: true,
            url,
            file_name: file_name.to_string(),
            file_size: size,
            file_type: kind.mime_type().to_string(),
        })
    }
}
