//! Puzzle worker
//!
//! Scans PGN games with a local UCI engine, builds forcing puzzle lines from
//! the blunders it finds and writes the complete ones as annotated PGN.

use chess_puzzler::Engine;
use clap::Parser;
use tracing::{error, info};

use puzzle_worker::analyzer;
use puzzle_worker::config::{Cli, WorkerConfig};
use puzzle_worker::stockfish::StockfishEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.quiet {
        tracing::Level::INFO
    } else {
        tracing::Level::DEBUG
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let config = WorkerConfig::load(cli)?;

    // No engine, no analysis: fail before touching any input
    let mut engine = match StockfishEngine::new(&config.engine).await {
        Ok(engine) => engine,
        Err(e) => {
            error!(path = %config.engine.path, error = %e, "Failed to start engine");
            return Err(e.into());
        }
    };
    info!(engine = %engine.name(), "Engine ready");

    let result = analyzer::run(&mut engine, &config).await;
    engine.quit().await;

    let stats = result?;
    info!(puzzles = stats.puzzles, output = %config.output.display(), "Done");
    Ok(())
}
