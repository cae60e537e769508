//! Candidate scanner: walks a game and flags moves where the evaluation jumps.

use shakmaty::{Chess, Move, Position};
use tracing::debug;

use chess_core::board::{is_terminal, material_total, move_number_prefix, piece_count, san_plus};
use chess_core::GameRecord;

use crate::engine::Engine;
use crate::error::PuzzleError;
use crate::score::{normalize, Eval, Score};

/// Total weighted material below which positions are not scanned
pub const MIN_MATERIAL_TOTAL: f64 = 3.0;

/// Occupied squares required for the centipawn-to-centipawn rules
pub const MIN_PIECE_COUNT: usize = 6;

/// |cp| below this is a balanced position
pub const BALANCED_CP: i32 = 110;

/// Minimum evaluation swing out of a balanced position
pub const SWING_CP: i32 = 110;

/// |cp| above this is a winning position
pub const WINNING_CP: i32 = 200;

/// A flagged move: the position before it, the move, and the surrounding
/// evaluations (both normalized to White)
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Half-move index of the move in the game
    pub ply: usize,
    pub position: Chess,
    pub blunder: Move,
    pub san: String,
    pub before: Score,
    pub after: Score,
}

/// Decide whether the move between two consecutive evaluations deserves a
/// deep look. `pos` is the position before the move.
pub fn should_investigate(a: &Score, b: &Score, pos: &Chess) -> bool {
    let board = pos.board();
    let (a, b) = (a.white(), b.white());

    match (a.eval(), b.eval()) {
        (Eval::Cp(a_cp), Eval::Cp(b_cp)) => {
            if material_total(board) <= MIN_MATERIAL_TOTAL || piece_count(board) <= MIN_PIECE_COUNT {
                return false;
            }
            if a_cp.abs() < BALANCED_CP && (b_cp - a_cp).abs() >= SWING_CP {
                return true;
            }
            if a_cp.abs() > WINNING_CP && b_cp.abs() < BALANCED_CP {
                return true;
            }
            a_cp.abs() > WINNING_CP && a.sign() != b.sign()
        }
        (Eval::Cp(a_cp), Eval::Mate(_)) => {
            material_total(board) > MIN_MATERIAL_TOTAL && a_cp.abs() < BALANCED_CP
        }
        (Eval::Mate(_), Eval::Mate(_)) => a.sign() != b.sign(),
        (Eval::Mate(_), Eval::Cp(_)) => false,
    }
}

/// Evaluate every position of a game and return the flagged moves.
///
/// The initial position is evaluated too, so the first move can be flagged.
/// Scanning stops at the first position with no legal moves or without an
/// engine result.
pub async fn scan_game<E: Engine>(
    engine: &mut E,
    game: &GameRecord,
    depth: u32,
) -> Result<Vec<Candidate>, PuzzleError> {
    let mut candidates = Vec::new();

    if is_terminal(&game.initial) {
        return Ok(candidates);
    }
    let Some(first) = engine.best_move(&game.initial, depth).await? else {
        return Ok(candidates);
    };
    let mut prev = normalize(&game.initial, first.score.eval());

    for (ply, (pos, mv)) in game.positions().into_iter().enumerate() {
        let mut next = pos.clone();
        next.play_unchecked(mv.clone());
        if is_terminal(&next) {
            break;
        }
        let Some(best) = engine.best_move(&next, depth).await? else {
            break;
        };
        let score = normalize(&next, best.score.eval());
        let san = san_plus(&pos, &mv);
        let flagged = should_investigate(&prev, &score, &pos);
        debug!(ply, investigate = flagged, "{}{} {}", move_number_prefix(&pos), san, score);

        if flagged {
            candidates.push(Candidate {
                ply,
                position: pos,
                blunder: mv,
                san,
                before: prev,
                after: score,
            });
        }
        prev = score;
    }

    Ok(candidates)
}
