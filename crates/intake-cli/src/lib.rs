//! Shared helpers for the `intake` command-line tool.

use anyhow::Context;
use intake_core::UploadError;
use intake_services::TableSchema;
use std::path::Path;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One line per field, `Table.Field (type)`, for a quick look at a base's
/// layout without the full JSON.
pub fn field_summary(tables: &[TableSchema], max_len: usize) -> Vec<String> {
    tables
        .iter()
        .flat_map(|table| {
            table.fields.iter().map(move |field| {
                truncate_string(
                    &format!("{}.{} ({})", table.name, field.name, field.field_type),
                    max_len,
                )
            })
        })
        .collect()
}

/// Size of the file at `path`, rejected before it is read when it exceeds
/// `max_bytes`.
pub async fn check_file_size(path: &Path, max_bytes: u64) -> anyhow::Result<u64> {
    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();
    if size > max_bytes {
        return Err(UploadError::TooLarge {
            size,
            max: max_bytes,
        }
        .into());
    }
    Ok(size)
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
