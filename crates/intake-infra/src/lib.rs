//! Intake Infrastructure Library
//!
//! Shared infrastructure used by the intake binaries:
//! - Middleware (request ID, security headers)
//! - Tracing initialization
//! - The JSON error body returned by the HTTP API

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{
    get_request_id, request_id_middleware, security_headers_middleware, RequestId,
};

#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, TelemetryConfig};

pub use error::ErrorResponse;
