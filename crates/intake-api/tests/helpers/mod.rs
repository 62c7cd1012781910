//! Test helpers: build AppState and router around a mock record store and
//! local storage in a temp dir.
//!
//! Run from workspace root: `cargo test -p intake-api`.

use axum_test::TestServer;
use intake_api::setup::routes;
use intake_api::state::AppState;
use intake_core::{AirtableConfig, Config, StorageBackend, StoreFailurePolicy};
use intake_services::test_helpers::MockLeadStore;
use intake_services::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const BASE_URL: &str = "http://localhost:3000/uploads";

/// Test application: server plus the handles tests inspect.
pub struct TestApp {
    pub server: TestServer,
    pub store: MockLeadStore,
    pub temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files written under the storage root.
    pub fn stored_file_count(&self) -> usize {
        let dir = self.temp_dir.path().join("leads");
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }
}

pub fn test_config(policy: StoreFailurePolicy) -> Config {
    Config {
        server_port: 3000,
        cors_origins: vec!["*".to_string()],
        environment: "test".to_string(),
        http_rate_limit_per_minute: 1_000,
        http_concurrency_limit: 100,
        airtable: AirtableConfig {
            api_url: "http://airtable.invalid/v0".to_string(),
            access_token: "pat-test".to_string(),
            base_id: "appTest".to_string(),
            table_name: "Leads".to_string(),
            attachment_field: "Aggrement".to_string(),
            timeout_secs: 5,
        },
        store_failure_policy: policy,
        storage_backend: StorageBackend::Local,
        firebase_bucket: None,
        local_storage_path: None,
        local_storage_base_url: Some(BASE_URL.to_string()),
        max_upload_bytes: MAX_UPLOAD_BYTES,
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config(StoreFailurePolicy::ReportSuccess)).await
}

pub async fn setup_test_app_with(mut config: Config) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    config.local_storage_path = Some(temp_dir.path().to_string_lossy().into_owned());

    let store = MockLeadStore::new();
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path(), BASE_URL.to_string())
            .await
            .unwrap(),
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(store.clone()),
        storage,
    ));
    let router = routes::setup_routes(&config, state).unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        store,
        temp_dir,
    }
}
