pub mod analyzer;
pub mod config;
pub mod error;
pub mod output;
pub mod stockfish;
