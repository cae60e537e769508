use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move, Position};

/// A single PGN tag pair, kept in source order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

/// A parsed game: tags, starting position and the mainline
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub tags: Vec<Tag>,
    /// Position before the first move (standard start unless a FEN tag was given)
    pub initial: Chess,
    pub moves: Vec<Move>,
    pub sans: Vec<String>, // as written in the source
    /// Comment following each move, if any
    pub comments: Vec<Option<String>>,
}

impl GameRecord {
    pub fn new(initial: Chess) -> Self {
        Self {
            tags: Vec::new(),
            initial,
            moves: Vec::new(),
            sans: Vec::new(),
            comments: Vec::new(),
        }
    }

    /// First value of a tag, by name
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.value.as_str())
    }

    /// A readable game identifier built from the roster tags
    pub fn id(&self) -> String {
        let white = self.tag("White").unwrap_or("?");
        let black = self.tag("Black").unwrap_or("?");
        match self.tag("Date") {
            Some(date) => format!("{white} - {black} ({date})"),
            None => format!("{white} - {black}"),
        }
    }

    /// Positions before each move, paired with the move
    pub fn positions(&self) -> Vec<(Chess, Move)> {
        let mut pos = self.initial.clone();
        let mut out = Vec::with_capacity(self.moves.len());
        for mv in &self.moves {
            out.push((pos.clone(), mv.clone()));
            pos.play_unchecked(mv.clone());
        }
        out
    }
}
