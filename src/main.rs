mod catalog;
mod config;
mod llm;
mod logging;
mod search;
mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dotenvy::dotenv;
use tracing::info;

use crate::config::AppConfig;
use crate::search::{SearchOrchestrator, intent_source_from_config};
use crate::server::AppState;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "catalog-search",
    version,
    about = "Product catalog HTTP backend with intent-aware search"
)]
pub(crate) struct Cli {
    /// Address to listen on (env CATALOG_BIND)
    #[arg(long, default_value = "")]
    bind: String,

    /// SeaORM database URL (env DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// OpenAI-compatible API base URL (env OPENAI_BASE_URL)
    #[arg(long, default_value = "")]
    base_url: String,

    /// Model used for intent extraction (env OPENAI_MODEL)
    #[arg(long, default_value = "")]
    model: String,

    /// API key; intent extraction runs offline without one (env OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// JSON file of products to load before serving
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, action = ArgAction::SetTrue)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_json)?;

    let cfg = AppConfig::from_cli(&cli)?;
    info!(
        bind = %cfg.bind_address,
        model = %cfg.model,
        oracle = cfg.oracle_enabled(),
        "app config"
    );

    let db = catalog::connection::connect_database(&cfg.database_url)
        .await
        .context("connect catalog database")?;
    catalog::migration::run_migrations(&db)
        .await
        .context("run catalog migrations")?;

    if let Some(path) = &cli.seed {
        catalog::seed::seed_from_file(&db, path)
            .await
            .with_context(|| format!("seed catalog from {}", path.display()))?;
    }

    let orchestrator = SearchOrchestrator::new(intent_source_from_config(&cfg)?);
    server::serve(&cfg.bind_address, AppState::new(db, orchestrator)).await
}
