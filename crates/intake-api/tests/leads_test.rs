//! Lead endpoint integration tests.
//!
//! Run with: `cargo test -p intake-api --test leads_test`

mod helpers;

use axum::http::StatusCode;
use helpers::{setup_test_app, setup_test_app_with, test_config};
use intake_api::constants::SUPPORT_FALLBACK_MESSAGE;
use intake_core::StoreFailurePolicy;
use intake_services::test_helpers::StoreCall;
use intake_services::StoreError;
use serde_json::{json, Value};

#[tokio::test]
async fn test_lead_without_attachment_is_created() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/leads")
        .json(&json!({ "name": "A", "email": "a@b.co", "caseDescription": "x" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["recordId"], "rec1");
    assert_eq!(body["outcome"], "created");

    let creates = app.store.create_calls();
    assert_eq!(creates.len(), 1);
    let fields = &creates[0];
    assert_eq!(fields.len(), 3);
    assert_eq!(fields["Name"], "A");
    assert_eq!(fields["Email"], "a@b.co");
    assert_eq!(fields["Case Description"], "x");
}

#[tokio::test]
async fn test_missing_name_is_rejected_without_store_write() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/leads")
        .json(&json!({ "email": "a@b.co" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Name is required");
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/leads")
        .json(&json!({ "name": "A", "email": "foo@bar" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_malformed_body_uses_error_shape() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/leads")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_disallowed_referenced_file_is_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/leads")
        .json(&json!({
            "name": "A",
            "email": "a@b.co",
            "fileUrl": "https://files.example.com/leads/x_archive.zip",
            "fileName": "archive.zip",
            "fileType": "application/zip"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.store.calls().is_empty());
}

#[tokio::test]
async fn test_attachment_falls_back_to_raw_patch() {
    let app = setup_test_app().await;
    app.store.fail_updates_touching(
        "Aggrement",
        StoreError::Api {
            status: 422,
            message: "INVALID_ATTACHMENT_OBJECT".to_string(),
        },
    );

    let response = app
        .client()
        .post("/leads")
        .json(&json!({
            "name": "A",
            "email": "a@b.co",
            "caseDescription": "x",
            "fileUrl": "https://files.example.com/leads/x_brief.pdf",
            "fileName": "brief.pdf",
            "fileType": "application/pdf",
            "fileSize": 2048
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["outcome"], "created_with_attachment");

    let calls = app.store.calls();
    assert!(matches!(calls[0], StoreCall::Create(_)));
    assert!(matches!(calls[1], StoreCall::Update { .. }));
    assert!(matches!(calls[2], StoreCall::PatchRaw { .. }));
    assert_eq!(calls.len(), 3);
}

#[tokio::test]
async fn test_store_failure_reports_success_by_default() {
    let app = setup_test_app().await;
    app.store.fail_next_creates(2, StoreError::RateLimited);

    let response = app
        .client()
        .post("/leads")
        .json(&json!({ "name": "A", "email": "a@b.co" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], SUPPORT_FALLBACK_MESSAGE);
    assert!(body.get("recordId").is_none());
}

#[tokio::test]
async fn test_surface_policy_returns_429_when_throttled() {
    let app = setup_test_app_with(test_config(StoreFailurePolicy::Surface)).await;
    app.store.fail_next_creates(2, StoreError::RateLimited);

    let response = app
        .client()
        .post("/leads")
        .json(&json!({ "name": "A", "email": "a@b.co" }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_surface_policy_returns_500_otherwise() {
    let app = setup_test_app_with(test_config(StoreFailurePolicy::Surface)).await;
    app.store.fail_next_creates(2, StoreError::Unauthorized);

    let response = app
        .client()
        .post("/leads")
        .json(&json!({ "name": "A", "email": "a@b.co" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}
