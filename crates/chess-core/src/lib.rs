//! Chess primitives shared by the puzzle crates: board helpers, game records
//! and PGN input/output.

pub mod board;
pub mod game_data;
pub mod pgn;

pub use game_data::{GameRecord, Tag};
pub use pgn::{AnnotatedMove, PgnError, PgnGames};
