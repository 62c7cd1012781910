//! OpenAPI documentation, served at `/api/openapi.json` and rendered by
//! RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::handlers;
use intake_core::models;

/// The OpenAPI document with the crate version filled in.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    spec.info.version = env!("CARGO_PKG_VERSION").to_string();
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Intake API",
        description = "Lead capture: validates contact-form leads, records them in Airtable and associates uploaded case documents."
    ),
    paths(
        handlers::leads::submit_lead,
        handlers::upload::upload_file,
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::LeadSubmission,
            models::UploadResponse,
            models::DocumentKind,
            models::AttachStrategyKind,
            handlers::leads::LeadResponse,
            handlers::health::HealthCheckResponse,
            intake_infra::ErrorResponse,
        )
    ),
    tags(
        (name = "leads", description = "Lead submission"),
        (name = "uploads", description = "Case document upload"),
        (name = "health", description = "Dependency health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_public_endpoint() {
        let spec = get_openapi_spec();
        for path in ["/leads", "/upload", "/health"] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
        assert_eq!(spec.info.version, env!("CARGO_PKG_VERSION"));
    }
}
