//! Worker error types

use chess_puzzler::{EngineError, PuzzleError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Puzzle error: {0}")]
    Puzzle(#[from] PuzzleError),

    #[error("PGN error: {0}")]
    Pgn(#[from] chess_core::PgnError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
