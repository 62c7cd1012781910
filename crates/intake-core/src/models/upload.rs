use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body of `POST /upload`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
}
