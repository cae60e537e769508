//! Category and completeness verdicts for a built puzzle line

use shakmaty::{Color, Position};

use chess_core::board::{material_difference, piece_count};

use super::extraction::MIN_PUZZLE_LENGTH;
use super::{Category, Puzzle};

/// Final material lead (in pawns) that counts as decisive
pub const DECISIVE_MATERIAL: f64 = 2.0;

/// Material the solver must win over the course of the line
pub const MIN_MATERIAL_GAIN: f64 = 1.0;

/// Material puzzles need more pieces than this on the final board
pub const MIN_PIECES: usize = 6;

pub fn category(puzzle: &Puzzle) -> Category {
    let solver = puzzle.solver();
    let end = puzzle.end_position();

    if end.is_checkmate() {
        return Category::Mate;
    }
    if let Some(last) = puzzle.nodes.last() {
        if last.score().for_color(solver).mate_in().is_some_and(|m| m > 0) {
            return Category::Mate;
        }
    }

    let start_diff = material_difference(puzzle.start_position().board(), solver);
    let end_diff = material_difference(end.board(), solver);
    if end_diff > 0.0 && end_diff > start_diff {
        Category::MaterialGain
    } else {
        Category::Equality
    }
}

pub fn is_complete(puzzle: &Puzzle) -> bool {
    if puzzle.nodes.len() < MIN_PUZZLE_LENGTH {
        return false;
    }
    // With at least three plies this also covers the last solver decision
    if puzzle.nodes.iter().skip(1).any(|n| n.ambiguous) {
        return false;
    }

    let solver = puzzle.solver();
    let end = puzzle.end_position();

    match category(puzzle) {
        Category::Mate => end.is_checkmate() && end.turn() != solver,
        Category::MaterialGain => {
            let start_diff = material_difference(puzzle.start_position().board(), solver);
            let end_diff = material_difference(end.board(), solver);
            let final_is_mate = puzzle.nodes.last().is_some_and(|n| n.score().is_mate());

            end_diff >= DECISIVE_MATERIAL
                && start_diff < DECISIVE_MATERIAL
                && end_diff - start_diff >= MIN_MATERIAL_GAIN
                && !final_is_mate
                && piece_count(end.board()) > MIN_PIECES
        }
        Category::Equality => false,
    }
}

/// The mating side, for mate puzzles
pub fn winner(puzzle: &Puzzle) -> Option<Color> {
    if category(puzzle) != Category::Mate {
        return None;
    }
    let end = puzzle.end_position();
    if end.is_checkmate() {
        Some(!end.turn())
    } else {
        Some(puzzle.solver())
    }
}
