use intake_core::Config;
use intake_services::{LeadStore, Storage, SubmissionReconciler, UploadService};
use std::sync::Arc;

/// Shared application state. Everything is constructed once at startup and
/// injected; handlers never reach for globals.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn LeadStore>,
    pub storage: Arc<dyn Storage>,
    pub reconciler: SubmissionReconciler,
    pub uploads: UploadService,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn LeadStore>, storage: Arc<dyn Storage>) -> Self {
        let reconciler = SubmissionReconciler::new(store.clone(), &config.airtable.attachment_field);
        let uploads = UploadService::new(storage.clone(), config.max_upload_bytes());

        Self {
            config,
            store,
            storage,
            reconciler,
            uploads,
        }
    }
}
