//! Worker configuration from the command line and environment variables

use std::env;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use shakmaty::Chess;
use tracing::info;

use chess_core::board::parse_fen;
use chess_puzzler::puzzle::extraction::{MAX_PUZZLE_LENGTH, MULTIPV};
use chess_puzzler::BuildOptions;

use crate::error::WorkerError;
use crate::stockfish::EngineOptions;

#[derive(Parser, Debug, Clone)]
#[command(name = "puzzle-worker")]
#[command(about = "Mine tactical puzzles from PGN games with a UCI engine")]
pub struct Cli {
    /// Engine threads (defaults to the number of CPUs)
    pub threads: Option<usize>,
    /// Engine hash table size in MB
    #[arg(default_value_t = 2048)]
    pub memory: usize,
    /// Search depth while scanning games for blunders
    #[arg(long, default_value_t = 15)]
    pub scan_depth: u32,
    /// Search depth while building puzzle lines
    #[arg(long, default_value_t = 24)]
    pub search_depth: u32,
    /// PGN file, or a glob pattern matching several
    #[arg(long, default_value = "games.pgn")]
    pub games: String,
    /// Where completed puzzles are written
    #[arg(long, default_value = "tactics.pgn")]
    pub output: PathBuf,
    /// Build a single puzzle from this position instead of scanning games
    #[arg(long)]
    pub fen: Option<String>,
    /// Only report blunder candidates, do not build lines
    #[arg(long)]
    pub scan_only: bool,
    /// Log progress only, no per-move traces
    #[arg(short, long)]
    pub quiet: bool,
    /// Require a single best move (false tolerates one alternative)
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub strict: bool,
    /// Engine binary (falls back to STOCKFISH_PATH, then `stockfish`)
    #[arg(long)]
    pub engine: Option<String>,
    /// Also write a JSON summary of the completed puzzles
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

/// What to analyze
#[derive(Clone, Debug)]
pub enum Input {
    Games(Vec<PathBuf>),
    Position(Chess),
}

#[derive(Clone, Debug)]
pub struct WorkerConfig {
    pub engine: EngineOptions,
    pub scan_depth: u32,
    pub build: BuildOptions,
    pub input: Input,
    pub output: PathBuf,
    pub summary: Option<PathBuf>,
    pub scan_only: bool,
}

impl WorkerConfig {
    /// Merge command line arguments with the environment and validate.
    pub fn load(cli: Cli) -> Result<Self, WorkerError> {
        let path = cli
            .engine
            .or_else(|| env::var("STOCKFISH_PATH").ok())
            .unwrap_or_else(|| "stockfish".to_string());

        let threads = cli.threads.unwrap_or_else(num_cpus::get);
        if threads == 0 {
            return Err(WorkerError::Config("threads must be at least 1".into()));
        }
        if cli.memory == 0 {
            return Err(WorkerError::Config("memory must be at least 1 MB".into()));
        }
        if cli.scan_depth == 0 || cli.search_depth == 0 {
            return Err(WorkerError::Config("search depths must be at least 1".into()));
        }

        let input = match &cli.fen {
            Some(fen) => Input::Position(
                parse_fen(fen).map_err(|e| WorkerError::Config(format!("invalid --fen: {e}")))?,
            ),
            None => Input::Games(resolve_games(&cli.games)?),
        };

        info!(engine = %path, threads, hash_mb = cli.memory, "Config loaded");

        Ok(Self {
            engine: EngineOptions {
                path,
                threads,
                hash_mb: cli.memory,
            },
            scan_depth: cli.scan_depth,
            build: BuildOptions {
                depth: cli.search_depth,
                multipv: MULTIPV,
                max_plies: MAX_PUZZLE_LENGTH,
                strict: cli.strict,
            },
            input,
            output: cli.output,
            summary: cli.summary,
            scan_only: cli.scan_only,
        })
    }
}

/// Expand a file name or glob pattern into sorted paths
pub fn resolve_games(pattern: &str) -> Result<Vec<PathBuf>, WorkerError> {
    if !pattern.contains(['*', '?', '[']) {
        return Ok(vec![PathBuf::from(pattern)]);
    }
    let mut paths: Vec<PathBuf> = glob::glob(pattern)
        .map_err(|e| WorkerError::Config(format!("bad --games pattern: {e}")))?
        .filter_map(Result::ok)
        .collect();
    if paths.is_empty() {
        return Err(WorkerError::Config(format!("no files match {pattern}")));
    }
    paths.sort();
    Ok(paths)
}
