//! API-level constants

/// Message returned with a 200 when no record could be created and the store
/// failure policy is `report_success`.
pub const SUPPORT_FALLBACK_MESSAGE: &str =
    "Your information was received, but we could not confirm it was saved. Please contact support if you do not hear from us.";

pub const LEAD_CREATED_MESSAGE: &str = "Lead submitted successfully";

/// Per-check timeout for the health endpoint.
pub const HEALTH_CHECK_TIMEOUT_SECS: u64 = 5;

/// Multipart framing allowance on top of the largest accepted file.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
