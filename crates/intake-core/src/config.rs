//! Configuration module
//!
//! Configuration is read once at startup from the environment (with `.env`
//! support) and then passed explicitly to every component that needs it.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use crate::constants::{DEFAULT_AIRTABLE_API_URL, DEFAULT_ATTACHMENT_FIELD};
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: &str = "3000";
const MAX_UPLOAD_SIZE_MB: usize = 10;
const HTTP_RATE_LIMIT_PER_MINUTE: u32 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 1_000;
const AIRTABLE_TIMEOUT_SECS: u64 = 15;

/// What the lead endpoint tells the submitter when no record could be created.
///
/// `ReportSuccess` answers 200 with a "received, contact support" message so
/// the visitor is never shown a failure; `Surface` returns the real status
/// (429 when the store throttled us, 500 otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreFailurePolicy {
    #[default]
    ReportSuccess,
    Surface,
}

impl FromStr for StoreFailurePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "report_success" | "report-success" | "swallow" => {
                Ok(StoreFailurePolicy::ReportSuccess)
            }
            "surface" | "strict" => Ok(StoreFailurePolicy::Surface),
            _ => Err(anyhow::anyhow!("Invalid store failure policy: {}", s)),
        }
    }
}

impl Display for StoreFailurePolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StoreFailurePolicy::ReportSuccess => write!(f, "report_success"),
            StoreFailurePolicy::Surface => write!(f, "surface"),
        }
    }
}

/// Airtable connection settings
#[derive(Clone)]
pub struct AirtableConfig {
    pub api_url: String,
    pub access_token: String,
    pub base_id: String,
    pub table_name: String,
    pub attachment_field: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for AirtableConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AirtableConfig")
            .field("api_url", &self.api_url)
            .field("access_token", &"[redacted]")
            .field("base_id", &self.base_id)
            .field("table_name", &self.table_name)
            .field("attachment_field", &self.attachment_field)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AirtableConfig {
    /// Read only the Airtable settings (used by the CLI, which has no server).
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(AirtableConfig {
            api_url: env::var("AIRTABLE_API_URL")
                .unwrap_or_else(|_| DEFAULT_AIRTABLE_API_URL.to_string()),
            access_token: env::var("AIRTABLE_ACCESS_TOKEN")
                .or_else(|_| env::var("AIRTABLE_API_KEY"))
                .map_err(|_| anyhow::anyhow!("AIRTABLE_ACCESS_TOKEN must be set"))?,
            base_id: env::var("AIRTABLE_BASE_ID")
                .map_err(|_| anyhow::anyhow!("AIRTABLE_BASE_ID must be set"))?,
            table_name: env::var("AIRTABLE_TABLE_NAME")
                .map_err(|_| anyhow::anyhow!("AIRTABLE_TABLE_NAME must be set"))?,
            attachment_field: env::var("AIRTABLE_ATTACHMENT_FIELD")
                .unwrap_or_else(|_| DEFAULT_ATTACHMENT_FIELD.to_string()),
            timeout_secs: env::var("AIRTABLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(AIRTABLE_TIMEOUT_SECS),
        })
    }
}

/// Service configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_rate_limit_per_minute: u32,
    pub http_concurrency_limit: usize,
    pub airtable: AirtableConfig,
    pub store_failure_policy: StoreFailurePolicy,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub firebase_bucket: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "firebase".to_string())
            .parse::<StorageBackend>()?;

        let store_failure_policy = match env::var("STORE_FAILURE_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => StoreFailurePolicy::default(),
        };

        Ok(Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins: parse_list(&cors_origins_str),
            environment,
            http_rate_limit_per_minute: env::var("HTTP_RATE_LIMIT_PER_MINUTE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_RATE_LIMIT_PER_MINUTE),
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            airtable: AirtableConfig::from_env()?,
            store_failure_policy,
            storage_backend,
            firebase_bucket: env::var("FIREBASE_STORAGE_BUCKET").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            max_upload_bytes: max_upload_size_mb * 1024 * 1024,
        })
    }

    pub fn is_production(&self) -> bool {
        is_production_name(&self.environment)
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_bytes as u64
    }
}

fn is_production_name(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

/// Split a comma-separated list, dropping empty entries.
pub fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failure_policy_parses_named_values() {
        assert_eq!(
            "report_success".parse::<StoreFailurePolicy>().unwrap(),
            StoreFailurePolicy::ReportSuccess
        );
        assert_eq!(
            "Surface".parse::<StoreFailurePolicy>().unwrap(),
            StoreFailurePolicy::Surface
        );
        assert!("maybe".parse::<StoreFailurePolicy>().is_err());
    }

    #[test]
    fn store_failure_policy_defaults_to_report_success() {
        assert_eq!(
            StoreFailurePolicy::default(),
            StoreFailurePolicy::ReportSuccess
        );
        assert_eq!(StoreFailurePolicy::default().to_string(), "report_success");
    }

    #[test]
    fn parse_list_trims_and_drops_empty_entries() {
        assert_eq!(
            parse_list(" https://a.example , ,https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn production_detection() {
        assert!(is_production_name("Production"));
        assert!(is_production_name("prod"));
        assert!(!is_production_name("staging"));
    }

    #[test]
    fn airtable_config_debug_redacts_token() {
        let config = AirtableConfig {
            api_url: DEFAULT_AIRTABLE_API_URL.to_string(),
            access_token: "patSECRET".to_string(),
            base_id: "app123".to_string(),
            table_name: "Leads".to_string(),
            attachment_field: DEFAULT_ATTACHMENT_FIELD.to_string(),
            timeout_secs: 5,
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("patSECRET"));
        assert!(debug.contains("app123"));
    }
}
