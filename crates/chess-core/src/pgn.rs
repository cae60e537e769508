//! PGN reading (pgn-reader visitor) and annotated PGN writing.

use std::io::{self, Read};
use std::ops::ControlFlow;

use pgn_reader::{RawComment, RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Move, Position};
use thiserror::Error;

use crate::board::{move_number_prefix, parse_fen};
use crate::game_data::{GameRecord, Tag};

/// Movetext is wrapped at this column
pub const LINE_WIDTH: usize = 80;

#[derive(Error, Debug)]
pub enum PgnError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid FEN tag: {0}")]
    InvalidFen(String),

    #[error("Illegal move {san} at ply {ply}")]
    IllegalMove { ply: usize, san: String },
}

/// Per-game movetext state
struct Movetext {
    record: GameRecord,
    pos: Chess,
    error: Option<PgnError>,
}

/// Collects every mainline game of a PGN stream into a `GameRecord`
struct GameCollector;

impl Visitor for GameCollector {
    type Tags = Vec<Tag>;
    type Movetext = Movetext;
    type Output = Result<GameRecord, PgnError>;

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Vec<Tag>> {
        ControlFlow::Continue(Vec::new())
    }

    fn tag(
        &mut self,
        tags: &mut Vec<Tag>,
        name: &[u8],
        value: RawTag<'_>,
    ) -> ControlFlow<Self::Output> {
        tags.push(Tag {
            name: String::from_utf8_lossy(name).into_owned(),
            value: value.decode_utf8_lossy().into_owned(),
        });
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: Vec<Tag>) -> ControlFlow<Self::Output, Movetext> {
        let initial = match tags.iter().find(|t| t.name == "FEN") {
            Some(fen) => match parse_fen(&fen.value) {
                Ok(pos) => pos,
                Err(e) => {
                    return ControlFlow::Break(Err(PgnError::InvalidFen(format!(
                        "{}: {e}",
                        fen.value
                    ))))
                }
            },
            None => Chess::default(),
        };

        let mut record = GameRecord::new(initial.clone());
        record.tags = tags;
        ControlFlow::Continue(Movetext {
            record,
            pos: initial,
            error: None,
        })
    }

    fn san(&mut self, state: &mut Movetext, san_plus: SanPlus) -> ControlFlow<Self::Output> {
        if state.error.is_some() {
            return ControlFlow::Continue(());
        }
        match san_plus.san.to_move(&state.pos) {
            Ok(mv) => {
                state.pos.play_unchecked(mv.clone());
                state.record.moves.push(mv);
                state.record.sans.push(san_plus.to_string());
                state.record.comments.push(None);
            }
            Err(_) => {
                state.error = Some(PgnError::IllegalMove {
                    ply: state.record.moves.len(),
                    san: san_plus.to_string(),
                });
            }
        }
        ControlFlow::Continue(())
    }

    fn comment(&mut self, state: &mut Movetext, comment: RawComment<'_>) -> ControlFlow<Self::Output> {
        let text = String::from_utf8_lossy(comment.as_bytes())
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        // Comments before the first move have no move to attach to
        if let Some(slot) = state.record.comments.last_mut() {
            match slot {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(&text);
                }
                None => *slot = Some(text),
            }
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _state: &mut Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, state: Movetext) -> Self::Output {
        match state.error {
            Some(e) => Err(e),
            None => Ok(state.record),
        }
    }
}

/// Iterator over the games of a PGN stream.
///
/// A malformed game yields `Err` for that game only; iteration continues with
/// the next one. An I/O error ends the iteration.
pub struct PgnGames<R> {
    reader: Reader<R>,
    done: bool,
}

impl<R: Read> PgnGames<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: Reader::new(inner),
            done: false,
        }
    }
}

impl<R: Read> Iterator for PgnGames<R> {
    type Item = Result<GameRecord, PgnError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.read_game(&mut GameCollector) {
            Ok(Some(result)) => Some(result),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(PgnError::Io(e)))
            }
        }
    }
}

/// Parse every game of an in-memory PGN string
pub fn parse_games(pgn: &str) -> Vec<Result<GameRecord, PgnError>> {
    PgnGames::new(pgn.as_bytes()).collect()
}

/// A move with an optional comment to write after it
#[derive(Debug, Clone)]
pub struct AnnotatedMove {
    pub mv: Move,
    pub san: String,
    pub comment: Option<String>,
}

/// Render a complete PGN record: tags, blank line, wrapped movetext, result.
pub fn write_game(tags: &[Tag], start: &Chess, moves: &[AnnotatedMove], result: &str) -> String {
    let mut out = String::new();
    for tag in tags {
        out.push_str(&format!("[{} \"{}\"]\n", tag.name, escape_tag_value(&tag.value)));
    }
    out.push('\n');
    out.push_str(&wrap(&movetext_tokens(start, moves, result), LINE_WIDTH));
    out.push('\n');
    out
}

/// Movetext tokens with move numbers. Black moves get an explicit `N...`
/// number when they open the line or follow a comment.
fn movetext_tokens(start: &Chess, moves: &[AnnotatedMove], result: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut pos = start.clone();
    let mut after_comment = true;

    for m in moves {
        if pos.turn().is_white() || after_comment {
            tokens.push(move_number_prefix(&pos));
        }
        tokens.push(m.san.clone());
        after_comment = false;
        if let Some(comment) = &m.comment {
            // Braces cannot be escaped inside a PGN comment
            tokens.push(format!("{{{}}}", comment.replace('}', ")")));
            after_comment = true;
        }
        pos.play_unchecked(m.mv.clone());
    }
    tokens.push(result.to_string());
    tokens
}

fn escape_tag_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Greedy word wrap. Comments are split on their inner spaces too, which
/// PGN readers accept.
fn wrap(tokens: &[String], width: usize) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for word in tokens.iter().flat_map(|t| t.split(' ')) {
        if line_len > 0 && line_len + 1 + word.len() > width {
            out.push('\n');
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word.len();
    }
    out
}
