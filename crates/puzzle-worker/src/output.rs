//! Puzzle output: annotated PGN records and an optional JSON summary

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use chess_core::board::{fen_of, move_to_uci};
use chess_puzzler::puzzle::pgn::to_pgn;
use chess_puzzler::{Category, Puzzle};

use crate::error::WorkerError;

/// Puzzle output for JSON serialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSummary {
    pub id: String,
    /// Position before the first move of `moves`
    pub fen: String,
    /// Starting move and solution in UCI notation
    pub moves: Vec<String>,
    pub category: Category,
    pub winner: Option<String>,
}

impl PuzzleSummary {
    pub fn from_puzzle(puzzle: &Puzzle) -> Self {
        Self {
            id: puzzle.id.clone(),
            fen: fen_of(&puzzle.initial_position),
            moves: puzzle.mainline().iter().map(move_to_uci).collect(),
            category: puzzle.category(),
            winner: puzzle.winner().map(|c| match c {
                Color::White => "white".to_string(),
                Color::Black => "black".to_string(),
            }),
        }
    }
}

/// Appends completed puzzles to the output file
pub struct PuzzleWriter {
    out: BufWriter<File>,
    engine_name: String,
    summaries: Vec<PuzzleSummary>,
}

impl PuzzleWriter {
    pub fn create(path: &Path, engine_name: &str) -> Result<Self, WorkerError> {
        Ok(Self {
            out: BufWriter::new(File::create(path)?),
            engine_name: engine_name.to_string(),
            summaries: Vec::new(),
        })
    }

    /// Write one record followed by a blank line
    pub fn write(&mut self, puzzle: &Puzzle) -> Result<(), WorkerError> {
        let pgn = to_pgn(puzzle, &self.engine_name);
        self.out.write_all(pgn.as_bytes())?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        self.summaries.push(PuzzleSummary::from_puzzle(puzzle));
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.summaries.len()
    }

    /// Write the JSON summary of everything written so far
    pub fn write_summary(&self, path: &Path) -> Result<(), WorkerError> {
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(file, &self.summaries)?;
        Ok(())
    }
}
