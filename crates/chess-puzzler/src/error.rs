//! Puzzle error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("Score has neither a centipawn nor a mate value")]
    Missing,

    #[error("Mate in 0: the position is already checkmate")]
    Mated,
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to spawn engine: {0}")]
    Spawn(String),

    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Engine closed its output")]
    Closed,

    #[error("Engine protocol error: {0}")]
    Protocol(String),

    #[error("Engine returned illegal move {uci} in {fen}")]
    IllegalMove { uci: String, fen: String },

    #[error("Engine score error: {0}")]
    Score(#[from] ScoreError),
}

#[derive(Error, Debug)]
pub enum PuzzleError {
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl PuzzleError {
    /// Engine failures end the run; everything else only affects one puzzle
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PuzzleError::Engine(EngineError::Io(_) | EngineError::Closed | EngineError::Spawn(_))
        )
    }
}
