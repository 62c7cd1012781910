//! Airtable REST client
//!
//! Record create/update, the raw PATCH used as the second attachment strategy,
//! and the meta API listings used by the CLI.

mod client;
mod models;

pub use client::AirtableClient;
pub use models::{AirtableRecord, BaseSummary, FieldSchema, TableSchema};
