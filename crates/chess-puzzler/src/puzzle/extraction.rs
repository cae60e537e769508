//! Line builder: extends a puzzle with the engine's best moves until the
//! line ends, turns ambiguous, or gets too long.

use tracing::debug;

use chess_core::board::{is_terminal, move_number_prefix};

use super::ambiguity::is_ambiguous;
use super::{PositionNode, Puzzle, Termination};
use crate::engine::Engine;
use crate::error::PuzzleError;
use crate::score::Score;

/// Maximum puzzle line length (in half-moves)
pub const MAX_PUZZLE_LENGTH: usize = 20;

/// Minimum puzzle line length (in half-moves)
pub const MIN_PUZZLE_LENGTH: usize = 3;

/// Candidates requested per position
pub const MULTIPV: usize = 3;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Search depth per position
    pub depth: u32,
    pub multipv: usize,
    pub max_plies: usize,
    /// Compare the best move with the second candidate rather than the third
    pub strict: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            depth: 24,
            multipv: MULTIPV,
            max_plies: MAX_PUZZLE_LENGTH,
            strict: true,
        }
    }
}

/// Extend `puzzle` from its start position (or from its last node, if it
/// already has some).
///
/// Solver plies sit at even indices. Only those are checked for ambiguity,
/// and the first one is exempt: the solver's first move is judged by the
/// blunder that preceded it, not by the alternatives. When the line stops
/// after a defender ply, that ply is dropped so the puzzle ends on a solver
/// move.
pub async fn extend_puzzle_line<E: Engine>(
    engine: &mut E,
    puzzle: &mut Puzzle,
    options: &BuildOptions,
) -> Result<(), PuzzleError> {
    let mut pos = puzzle.end_position();

    let termination = loop {
        let index = puzzle.nodes.len();
        if index >= options.max_plies {
            break Termination::MaxPlies;
        }
        if is_terminal(&pos) {
            break Termination::Terminal;
        }

        let candidates = engine.best_moves(&pos, options.depth, options.multipv).await?;
        let solver_ply = index % 2 == 0;
        let scores: Vec<Score> = candidates.iter().map(|c| c.score).collect();
        let ambiguous = solver_ply && is_ambiguous(&scores, options.strict);

        if ambiguous && index > 0 {
            debug!(id = %puzzle.id, index, "ambiguous position, line ends");
            break Termination::Ambiguous { candidates };
        }

        let Some(node) = PositionNode::new(pos.clone(), candidates, ambiguous) else {
            break Termination::NoCandidates;
        };

        let chosen = node.chosen();
        debug!(
            id = %puzzle.id,
            index,
            "{}{} {}",
            move_number_prefix(&pos),
            chosen.san,
            chosen.score
        );

        pos = node.position_after();
        puzzle.nodes.push(node);
    };

    if puzzle.nodes.len() % 2 == 0 {
        puzzle.nodes.pop();
    }

    debug!(id = %puzzle.id, plies = puzzle.nodes.len(), ?termination, "line built");
    puzzle.termination = Some(termination);
    Ok(())
}
