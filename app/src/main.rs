// In app/src/main.rs

use anyhow::Result;
use app_config::Settings;
use chrono::Utc;
use clap::{Parser, Subcommand};
use core_types::Period;
use database::{MemoryStore, TradeStore};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use web_server::AppState;

mod report;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "A BTMM trading journal: trade log, REST API and performance analytics."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the journal REST API.
    Serve {
        /// Keep trades in process memory instead of Postgres. Nothing survives a restart.
        #[arg(long)]
        in_memory: bool,
    },

    /// Prints performance statistics for the configured user.
    Report {
        /// The lookback window: 7d, 30d, 90d or 1y.
        #[arg(short, long, default_value = "30d")]
        period: String,
    },
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings()?;
    init_tracing(&settings.app.log_level);

    tracing::info!(environment = %settings.app.environment, "Starting trading journal");

    match cli.command {
        Commands::Serve { in_memory } => {
            handle_serve(settings, in_memory).await?;
        }
        Commands::Report { period } => {
            handle_report(settings, &period).await?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let default_level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("sqlx::query", tracing::Level::WARN) // Disable sqlx query debug logs
            .with_default(default_level));
    tracing_subscriber::registry().with(fmt_layer).init();
}

async fn open_store(settings: &Settings, in_memory: bool) -> Result<Arc<dyn TradeStore>> {
    if in_memory {
        tracing::warn!("Using the in-memory trade store. Trades will be lost on shutdown.");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db = database::connect(&settings.database).await?;
    tracing::info!("Database connection established and migrations are up-to-date.");
    Ok(Arc::new(db))
}

// --- "Serve" Subcommand Logic ---

async fn handle_serve(settings: Settings, in_memory: bool) -> Result<()> {
    let store = open_store(&settings, in_memory).await?;
    let app_state = AppState::new(store, settings.app.user_id);

    web_server::run(settings.server, app_state).await?;
    Ok(())
}

// --- "Report" Subcommand Logic ---

async fn handle_report(settings: Settings, period_token: &str) -> Result<()> {
    let period = period_token.parse::<Period>().unwrap_or_else(|_| {
        tracing::warn!(period_token, "Unrecognised period, falling back to 30d");
        Period::default()
    });

    let store = open_store(&settings, false).await?;
    let journal =
        report::build_report(store.as_ref(), settings.app.user_id, period, Utc::now()).await?;
    report::print_report(&journal)?;
    Ok(())
}
