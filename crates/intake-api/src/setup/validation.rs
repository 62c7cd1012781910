//! Configuration validation
//!
//! Cross-field checks run before anything connects, so a misconfigured
//! deployment fails at startup instead of on the first lead.

use anyhow::Result;
use intake_core::{Config, StorageBackend};

use crate::utils::ip_extraction::trusted_proxy_count;

pub fn validate_config(config: &Config) -> Result<()> {
    if config.is_production() && config.cors_origins.iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.http_rate_limit_per_minute == 0 {
        return Err(anyhow::anyhow!("HTTP_RATE_LIMIT_PER_MINUTE cannot be 0"));
    }

    if config.max_upload_bytes == 0 {
        return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
    }

    if config.airtable.timeout_secs == 0 {
        return Err(anyhow::anyhow!("AIRTABLE_TIMEOUT_SECS cannot be 0"));
    }

    if config.airtable.attachment_field.trim().is_empty() {
        return Err(anyhow::anyhow!("AIRTABLE_ATTACHMENT_FIELD cannot be empty"));
    }

    match config.storage_backend {
        StorageBackend::Firebase => {
            if config.firebase_bucket.as_deref().map_or(true, |b| b.trim().is_empty()) {
                return Err(anyhow::anyhow!(
                    "FIREBASE_STORAGE_BUCKET must be set when STORAGE_BACKEND=firebase"
                ));
            }
        }
        StorageBackend::Local => {
            if config.local_storage_path.is_none() || config.local_storage_base_url.is_none() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local"
                ));
            }
            if config.is_production() {
                tracing::warn!("Local storage backend in production - uploads are not replicated");
            }
        }
    }

    let proxies = trusted_proxy_count();
    if proxies > 10 {
        tracing::warn!(
            trusted_proxy_count = proxies,
            "TRUSTED_PROXY_COUNT is very high - ensure this matches your actual proxy setup"
        );
    }

    Ok(())
}
