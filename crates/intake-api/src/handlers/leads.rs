//! `POST /leads`

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use intake_core::{validate_lead, AppError, LeadSubmission, StoreFailurePolicy, SubmissionOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::constants::{LEAD_CREATED_MESSAGE, SUPPORT_FALLBACK_MESSAGE};
use crate::error::{HttpAppError, ValidatedJson};
use crate::state::AppState;

/// Response body of a lead submission that was accepted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    /// Outcome tag, e.g. `created_with_attachment`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
}

#[utoipa::path(
    post,
    path = "/leads",
    tag = "leads",
    request_body = LeadSubmission,
    responses(
        (status = 201, description = "Lead recorded", body = LeadResponse),
        (status = 200, description = "Lead received but not confirmed saved (report_success policy)", body = LeadResponse),
        (status = 400, description = "Invalid lead or attachment", body = intake_infra::ErrorResponse),
        (status = 429, description = "Record store throttled the request (surface policy)", body = intake_infra::ErrorResponse),
        (status = 500, description = "Record could not be created (surface policy)", body = intake_infra::ErrorResponse)
    )
)]
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    ValidatedJson(submission): ValidatedJson<LeadSubmission>,
) -> Result<Response, HttpAppError> {
    let lead = validate_lead(&submission, state.config.max_upload_bytes())?;

    tracing::debug!(
        has_description = lead.case_description.is_some(),
        has_attachment = lead.attachment.is_some(),
        "Lead validated"
    );

    let outcome = state.reconciler.submit(&lead).await;

    match outcome {
        SubmissionOutcome::Failed {
            reason,
            rate_limited,
        } => match state.config.store_failure_policy {
            StoreFailurePolicy::ReportSuccess => Ok((
                StatusCode::OK,
                Json(LeadResponse {
                    success: true,
                    message: Some(SUPPORT_FALLBACK_MESSAGE.to_string()),
                    record_id: None,
                    outcome: None,
                }),
            )
                .into_response()),
            StoreFailurePolicy::Surface if rate_limited => {
                Err(AppError::RateLimited(reason).into())
            }
            StoreFailurePolicy::Surface => Err(AppError::Store(reason).into()),
        },
        outcome => Ok((
            StatusCode::CREATED,
            Json(LeadResponse {
                success: true,
                message: Some(LEAD_CREATED_MESSAGE.to_string()),
                record_id: outcome.record_id().map(String::from),
                outcome: Some(outcome.tag().to_string()),
            }),
        )
            .into_response()),
    }
}
