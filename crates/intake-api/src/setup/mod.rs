//! Application setup and initialization
//!
//! Everything `main.rs` needs to go from a `Config` to a served router.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use intake_core::Config;
use intake_infra::{init_telemetry, TelemetryConfig};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    let telemetry = TelemetryConfig::from_env(
        "intake-api",
        env!("CARGO_PKG_VERSION"),
        &config.environment,
    );
    init_telemetry(&telemetry)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        store_failure_policy = %config.store_failure_policy,
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;
    let state = services::initialize_services(&config, storage)?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
