//! Report Viewer Server
//!
//! Run with: cargo run --bin report-viewer -- --db-path "EFRIS PDF Report.db"
//!
//! # Configuration
//!
//! Precedence: command-line flags, then environment (a `.env` file is
//! loaded first), then the config file, then built-in defaults.
//!
//! Environment variables:
//! - `DB_FILEPATH`: SQLite database to open (no default)
//! - `TABLE_NAME`: Table to view (default: EfrisPdfReport)
//! - `DATE_COLUMN`: Column holding the activity date (default: Activity Date)
//! - `VIEWER_HOST`: Host to bind to (default: 127.0.0.1)
//! - `VIEWER_PORT`: Port to listen on (default: 8501)
//! - `VIEWER_LOG_LEVEL`: Log level (default: info)
//! - `VIEWER_LOG_FORMAT`: `pretty` or `json` (default: pretty)
//! - `RUST_LOG`: Full tracing filter, overrides `VIEWER_LOG_LEVEL`

use anyhow::Context;
use clap::Parser;
use report_viewer::api::{serve, AppState};
use report_viewer::config::{Config, ConfigOverrides, LoggingConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "report-viewer")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse, filter and export a table from a local SQLite report database")]
struct Args {
    /// SQLite database path
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Table to view
    #[arg(short, long)]
    table: Option<String>,

    /// Config file (default: platform config dir, then ./report-viewer.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment file to load instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_file = match &args.env_file {
        Some(path) => Some(
            dotenvy::from_path(path)
                .map(|_| path.clone())
                .with_context(|| format!("Failed to load environment file {:?}", path))?,
        ),
        None => dotenvy::dotenv().ok(),
    };

    let overrides = ConfigOverrides {
        db_path: args.db_path,
        table_name: args.table,
        host: args.host,
        port: args.port,
    };
    let config = Config::load_with_overrides(args.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;

    init_tracing(&config.logging);

    tracing::info!("Starting report viewer v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = env_file {
        tracing::info!("Loaded environment from {:?}", path);
    }
    match &config.source.db_path {
        Some(path) => tracing::info!("Database: {:?}", path),
        None => tracing::warn!("No database configured; enter a path in the page sidebar"),
    }
    tracing::info!("Table: {}", config.source.table_name);

    let server = config.server.clone();
    serve(AppState::new(config), &server).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("report_viewer={},tower_http=info", logging.level).into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
