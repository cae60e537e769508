//! Annotated PGN export of puzzles.
//!
//! Each move except the last carries a comment listing the candidates the
//! engine considered at the position that follows it, e.g.
//! `{Rb7+ (mate in 2) Ra7+ (mate in 2) Rg5 (310)}`. Scores are from the point
//! of view of the side choosing among the candidates.

use regex::Regex;
use shakmaty::Color;

use chess_core::board::{fen_of, san_plus};
use chess_core::pgn::write_game;
use chess_core::{AnnotatedMove, Tag};

use super::Puzzle;
use crate::engine::CandidateMove;
use crate::score::Eval;

/// Tags written by the exporter itself; source values for these are dropped
const OWN_TAGS: [&str; 5] = ["FEN", "SetUp", "PuzzleEngine", "PuzzleCategory", "PuzzleWinner"];

/// Render one candidate list as a comment body
pub fn annotation(candidates: &[CandidateMove]) -> String {
    candidates
        .iter()
        .map(|c| match c.score.eval() {
            Eval::Cp(cp) => format!("{} ({cp})", c.san),
            Eval::Mate(m) => format!("{} (mate in {m})", c.san),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Inverse of [`annotation`]: `(san, eval)` pairs in order
pub fn parse_annotation(comment: &str) -> Vec<(String, Eval)> {
    let Ok(re) = Regex::new(r"(\S+)\s+\((?:mate\s+in\s+(-?\d+)|(-?\d+))\)") else {
        return Vec::new();
    };
    re.captures_iter(comment)
        .filter_map(|cap| {
            let san = cap.get(1)?.as_str().to_string();
            let eval = match (cap.get(2), cap.get(3)) {
                (Some(m), _) => Eval::Mate(m.as_str().parse().ok()?),
                (None, Some(cp)) => Eval::Cp(cp.as_str().parse().ok()?),
                (None, None) => return None,
            };
            Some((san, eval))
        })
        .collect()
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

fn tag(name: &str, value: impl Into<String>) -> Tag {
    Tag {
        name: name.to_string(),
        value: value.into(),
    }
}

/// Tags for an exported puzzle: source tags in order, then the position and
/// puzzle tags
pub fn puzzle_tags(puzzle: &Puzzle, engine_name: &str) -> Vec<Tag> {
    let mut tags: Vec<Tag> = if puzzle.tags.is_empty() {
        vec![tag("Event", "?"), tag("Site", "?"), tag("Result", "*")]
    } else {
        puzzle
            .tags
            .iter()
            .filter(|t| !OWN_TAGS.contains(&t.name.as_str()))
            .cloned()
            .collect()
    };

    tags.push(tag("FEN", fen_of(&puzzle.initial_position)));
    tags.push(tag("SetUp", "1"));
    tags.push(tag("PuzzleEngine", engine_name));
    tags.push(tag("PuzzleCategory", puzzle.category().to_string()));
    if let Some(winner) = puzzle.winner() {
        tags.push(tag("PuzzleWinner", color_name(winner)));
    }
    tags
}

/// Export a puzzle as one annotated PGN record
pub fn to_pgn(puzzle: &Puzzle, engine_name: &str) -> String {
    let tags = puzzle_tags(puzzle, engine_name);
    let result = tags
        .iter()
        .find(|t| t.name == "Result")
        .map(|t| t.value.clone())
        .unwrap_or_else(|| "*".to_string());

    let mut moves = Vec::with_capacity(puzzle.nodes.len() + 1);
    if let Some(mv) = &puzzle.starting_move {
        moves.push(AnnotatedMove {
            mv: mv.clone(),
            san: san_plus(&puzzle.initial_position, mv),
            comment: puzzle.nodes.first().map(|n| annotation(n.candidates())),
        });
    }
    for (i, node) in puzzle.nodes.iter().enumerate() {
        moves.push(AnnotatedMove {
            mv: node.played().clone(),
            san: node.chosen().san.clone(),
            comment: puzzle.nodes.get(i + 1).map(|next| annotation(next.candidates())),
        });
    }

    write_game(&tags, &puzzle.initial_position, &moves, &result)
}
