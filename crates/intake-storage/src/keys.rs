//! Shared key generation for storage backends.
//!
//! Key format: `leads/{uuid}_{sanitized filename}`.

use uuid::Uuid;

/// Prefix under which every uploaded lead document is stored.
pub const KEY_PREFIX: &str = "leads";

const MAX_SEGMENT_LENGTH: usize = 200;

/// Generate a fresh storage key for an uploaded file.
///
/// The UUID prefix keeps two uploads with the same name from overwriting each
/// other; the name part is reduced to characters safe in both object keys and
/// filesystem paths.
pub fn generate_storage_key(file_name: &str) -> String {
    format!(
        "{}/{}_{}",
        KEY_PREFIX,
        Uuid::new_v4(),
        sanitize_key_segment(file_name)
    )
}

/// Reduce a file name to `[A-Za-z0-9._-]`, dropping any directory part and
/// leading dots. Never returns an empty string.
pub fn sanitize_key_segment(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(MAX_SEGMENT_LENGTH)
        .collect();

    let sanitized = sanitized.replace("..", "_");
    let trimmed = sanitized.trim_start_matches('.');

    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether a key is safe to hand to a backend.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.contains("..") && !key.starts_with('/') && !key.contains('\\')
}
