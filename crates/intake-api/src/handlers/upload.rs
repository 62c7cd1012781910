//! `POST /upload`

use axum::{
    extract::{Multipart, State},
    Json,
};
use intake_core::models::UploadResponse;
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, sanitize_filename};

#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing, disallowed or oversized file", body = intake_infra::ErrorResponse),
        (status = 413, description = "Request body too large", body = intake_infra::ErrorResponse),
        (status = 500, description = "Storage failure", body = intake_infra::ErrorResponse)
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let file = extract_multipart_file(multipart).await?;
    let file_name = sanitize_filename(&file.file_name)?;

    tracing::debug!(
        file_name = %file_name,
        content_type = %file.content_type,
        size_bytes = file.data.len(),
        "Upload received"
    );

    let response = state
        .uploads
        .store_file(&file_name, &file.content_type, file.data)
        .await?;

    Ok(Json(response))
}
