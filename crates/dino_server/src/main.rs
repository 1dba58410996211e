//! Dino Extinction - battle driver
//!
//! Reads JSON requests from stdin, one per line, and writes one JSON
//! response per line to stdout. Logs go to stderr.

use std::path::PathBuf;

use clap::Parser;
use dino_core::store::InMemoryStore;
use dino_server::{BattleService, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dino-server")]
#[command(about = "Drive Dino Extinction battles over JSON lines")]
struct Cli {
    /// Path to a RON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for id generation (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => match ServerConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Failed to load config {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => ServerConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.rng_seed = Some(seed);
    }

    tracing::info!(
        board_size = config.default_board_size,
        store_attempts = config.store_retry_attempts,
        "Starting Dino Extinction driver"
    );

    let service = BattleService::new(InMemoryStore::new(), config);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    if let Err(e) = dino_server::driver::run_lines(&service, stdin, tokio::io::stdout()).await {
        tracing::error!("Driver stopped: {e}");
        std::process::exit(1);
    }
}
