//! CLI entry point for the GTFS timetable mirror.
//!
//! Checks the publisher's permalink for the current release and, if it is not
//! in the bucket yet, converts its tables to Parquet and uploads them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gtfs_mirror::config::{DEFAULT_ENTRY_URL, StorageConfig};
use gtfs_mirror::fetch::BasicClient;
use gtfs_mirror::output::{print_json, print_pretty, print_totals};
use gtfs_mirror::storage::S3Store;
use gtfs_mirror::{Mirror, RunOutcome};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "gtfs_mirror")]
#[command(about = "Mirror the current GTFS timetable release to S3 as Parquet", long_about = None)]
struct Cli {
    /// Permalink that redirects to the current release archive
    #[arg(long, env = "ENTRY_URL", default_value = DEFAULT_ENTRY_URL, global = true)]
    entry_url: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror the current release unless it is already in the bucket (default)
    Run,
    /// Show the current release and whether it is already mirrored
    Status,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gtfs_mirror.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gtfs_mirror.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let storage = StorageConfig::from_env().context("Storage configuration is incomplete")?;
    info!(endpoint = %storage.endpoint_url(), bucket = %storage.bucket, "Connecting to storage");
    let store = S3Store::connect(&storage).await;

    let resolver = BasicClient::without_redirects().context("Failed to build HTTP client")?;
    let downloader = BasicClient::new().context("Failed to build HTTP client")?;
    let mirror = Mirror::new(&resolver, &downloader, &store);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => match mirror.run(&cli.entry_url).await? {
            RunOutcome::AlreadyMirrored { release } => {
                info!(release = %release, "Release already present, exiting");
            }
            RunOutcome::Mirrored(summary) => {
                print_pretty(&summary);
                print_json(&summary)?;
                print_totals(&summary);
            }
        },
        Commands::Status => {
            let status = mirror.status(&cli.entry_url).await?;
            info!(
                release = %status.release,
                url = %status.url,
                mirrored = status.mirrored,
                "Current release"
            );
        }
    }

    Ok(())
}
