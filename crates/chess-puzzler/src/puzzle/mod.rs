//! Puzzle data model: a starting position plus an engine-built forcing line

pub mod ambiguity;
pub mod cook;
pub mod extraction;
pub mod pgn;

use std::fmt;

use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Color, Move, Position};

use chess_core::{GameRecord, Tag};

use crate::engine::{CandidateMove, Engine};
use crate::error::PuzzleError;
use crate::scanner::Candidate;
use crate::score::Score;
use extraction::BuildOptions;

/// Puzzle category, decided from the end of the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Mate,
    MaterialGain,
    Equality,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Mate => "Mate",
            Category::MaterialGain => "Material",
            Category::Equality => "Equality",
        })
    }
}

/// Why line construction stopped
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The solver had no single clearly best move; holds the candidates compared
    Ambiguous { candidates: Vec<CandidateMove> },
    /// No legal moves left (checkmate or stalemate)
    Terminal,
    /// The engine returned no candidate
    NoCandidates,
    MaxPlies,
}

/// One ply of the line: the position, the engine's ranked candidates and the
/// move taken (always the top candidate)
#[derive(Debug, Clone)]
pub struct PositionNode {
    /// Position BEFORE the move
    pub position: Chess,
    candidates: Vec<CandidateMove>,
    pub ambiguous: bool,
}

impl PositionNode {
    /// `None` when there are no candidates to take a move from
    pub fn new(position: Chess, candidates: Vec<CandidateMove>, ambiguous: bool) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        Some(Self {
            position,
            candidates,
            ambiguous,
        })
    }

    pub fn candidates(&self) -> &[CandidateMove] {
        &self.candidates
    }

    pub fn chosen(&self) -> &CandidateMove {
        &self.candidates[0]
    }

    pub fn played(&self) -> &Move {
        &self.chosen().mv
    }

    /// Score of the played move from the mover's point of view
    pub fn score(&self) -> Score {
        self.chosen().score
    }

    pub fn position_after(&self) -> Chess {
        let mut pos = self.position.clone();
        pos.play_unchecked(self.played().clone());
        pos
    }
}

#[derive(Debug, Clone)]
pub struct Puzzle {
    pub id: String,
    /// Tags of the source game (empty in single-position mode)
    pub tags: Vec<Tag>,
    /// Position before the starting move
    pub initial_position: Chess,
    /// The opponent's mistake; `None` when starting from a bare position
    pub starting_move: Option<Move>,
    pub nodes: Vec<PositionNode>,
    pub termination: Option<Termination>,
}

impl Puzzle {
    /// A puzzle seeded from a flagged game move
    pub fn from_candidate(game: &GameRecord, candidate: &Candidate) -> Self {
        Self {
            id: format!("{} #{}", game.id(), candidate.ply),
            tags: game.tags.clone(),
            initial_position: candidate.position.clone(),
            starting_move: Some(candidate.blunder.clone()),
            nodes: Vec::new(),
            termination: None,
        }
    }

    /// A puzzle whose line starts directly at `position`
    pub fn from_position(id: impl Into<String>, position: Chess) -> Self {
        Self {
            id: id.into(),
            tags: Vec::new(),
            initial_position: position,
            starting_move: None,
            nodes: Vec::new(),
            termination: None,
        }
    }

    /// Position where the solver's line begins
    pub fn start_position(&self) -> Chess {
        let mut pos = self.initial_position.clone();
        if let Some(mv) = &self.starting_move {
            pos.play_unchecked(mv.clone());
        }
        pos
    }

    /// Side that plays the best moves
    pub fn solver(&self) -> Color {
        self.start_position().turn()
    }

    pub fn end_position(&self) -> Chess {
        match self.nodes.last() {
            Some(node) => node.position_after(),
            None => self.start_position(),
        }
    }

    /// Starting move (if any) followed by every line move
    pub fn mainline(&self) -> Vec<Move> {
        self.starting_move
            .iter()
            .cloned()
            .chain(self.nodes.iter().map(|n| n.played().clone()))
            .collect()
    }

    /// Build the line with the engine
    pub async fn generate<E: Engine>(
        &mut self,
        engine: &mut E,
        options: &BuildOptions,
    ) -> Result<(), PuzzleError> {
        extraction::extend_puzzle_line(engine, self, options).await
    }

    pub fn category(&self) -> Category {
        cook::category(self)
    }

    pub fn is_complete(&self) -> bool {
        cook::is_complete(self)
    }

    pub fn winner(&self) -> Option<Color> {
        cook::winner(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names() {
        assert_eq!(Category::MaterialGain.to_string(), "Material");
        assert_eq!(
            serde_json::to_string(&Category::MaterialGain).unwrap(),
            "\"materialGain\""
        );
    }

    #[test]
    fn test_node_needs_a_candidate() {
        assert!(PositionNode::new(Chess::default(), Vec::new(), false).is_none());
    }
}
