//! Intake API Library
//!
//! HTTP handlers, middleware and application setup for the lead intake
//! service. The binary in `main.rs` only loads configuration and calls
//! `setup::initialize_app`; integration tests build the same router around
//! injected stores.

mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod setup;
mod utils;

pub mod error;
pub mod state;

// Re-exports
pub use api_doc::get_openapi_spec;
pub use error::{HttpAppError, ValidatedJson};
pub use handlers::leads::LeadResponse;
pub use intake_infra::ErrorResponse;
pub use state::AppState;
