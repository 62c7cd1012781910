//! Record store client and application state

use anyhow::{Context, Result};
use intake_core::Config;
use intake_services::{AirtableClient, LeadStore, Storage};
use std::sync::Arc;

use crate::state::AppState;

/// Build the Airtable client and assemble the shared state around it.
pub fn initialize_services(config: &Config, storage: Arc<dyn Storage>) -> Result<Arc<AppState>> {
    let client = AirtableClient::new(&config.airtable).context("Failed to build Airtable client")?;
    let store: Arc<dyn LeadStore> = Arc::new(client);

    tracing::info!(
        base_id = %config.airtable.base_id,
        table = %config.airtable.table_name,
        timeout_secs = config.airtable.timeout_secs,
        "Airtable client initialized"
    );

    Ok(Arc::new(AppState::new(config.clone(), store, storage)))
}
