//! Tactical puzzle mining: score helpers, blunder scanning, engine-built
//! forcing lines, completeness rules and annotated export.

pub mod engine;
pub mod error;
pub mod puzzle;
pub mod scanner;
pub mod score;

pub use engine::{CandidateMove, Engine};
pub use error::{EngineError, PuzzleError, ScoreError};
pub use puzzle::extraction::BuildOptions;
pub use puzzle::{Category, PositionNode, Puzzle, Termination};
pub use scanner::{scan_game, should_investigate, Candidate};
pub use score::{normalize, Eval, Score};
