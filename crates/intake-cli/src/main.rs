//! `intake` - command-line companion to the intake API.
//!
//! Reads the same environment (and `.env`) as the server. `bases` and
//! `tables` only need Airtable credentials; `submit` and `upload` run the
//! same validation, reconciliation and upload gate the HTTP endpoints use.

use anyhow::Context;
use clap::{Parser, Subcommand};
use intake_cli::{check_file_size, field_summary, init_tracing};
use intake_core::{validate_lead, AirtableConfig, Config, DocumentKind, LeadSubmission};
use intake_services::{create_storage, AirtableClient, SubmissionReconciler, UploadService};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "intake", about = "Lead intake CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the Airtable bases the access token can see
    Bases,
    /// List tables and fields of the configured base
    Tables {
        /// Print one `Table.Field (type)` line per field instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Validate a lead and record it in Airtable
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        description: Option<String>,
        /// Public URL of an already uploaded file
        #[arg(long)]
        file_url: Option<String>,
        #[arg(long)]
        file_name: Option<String>,
        #[arg(long)]
        file_type: Option<String>,
        #[arg(long)]
        file_size: Option<u64>,
    },
    /// Check a file against the upload gate and store it
    Upload {
        /// Path to the file to upload
        file: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bases => {
            let client = airtable_client()?;
            let bases = client.list_bases().await?;
            print_json(&bases)?;
        }
        Commands::Tables { summary } => {
            let client = airtable_client()?;
            let tables = client.list_tables().await?;
            if summary {
                for line in field_summary(&tables, 120) {
                    println!("{}", line);
                }
            } else {
                print_json(&tables)?;
            }
        }
        Commands::Submit {
            name,
            email,
            description,
            file_url,
            file_name,
            file_type,
            file_size,
        } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            let submission = LeadSubmission {
                name: Some(name),
                email: Some(email),
                case_description: description,
                file_url,
                file_name,
                file_type,
                file_size,
            };
            let lead = validate_lead(&submission, config.max_upload_bytes())?;

            let client = AirtableClient::new(&config.airtable)?;
            let reconciler =
                SubmissionReconciler::new(Arc::new(client), &config.airtable.attachment_field);
            let outcome = reconciler.submit(&lead).await;

            print_json(&outcome)?;
            if outcome.is_failed() {
                anyhow::bail!("Lead was not recorded");
            }
        }
        Commands::Upload { file } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            check_file_size(&file, config.max_upload_bytes()).await?;
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("file")
                .to_string();
            let content_type = DocumentKind::from_file_name(&file_name)
                .map(|kind| kind.mime_type())
                .unwrap_or("application/octet-stream");

            let storage = create_storage(&config).await?;
            let uploads = UploadService::new(storage, config.max_upload_bytes());
            let response = uploads.store_file(&file_name, content_type, data).await?;
            print_json(&response)?;
        }
    }

    Ok(())
}

fn airtable_client() -> anyhow::Result<AirtableClient> {
    let config = AirtableConfig::from_env()?;
    AirtableClient::new(&config).context("Failed to create Airtable client")
}
