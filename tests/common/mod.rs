#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;

use shakmaty::{Chess, Move, Position};

use chess_core::board::{fen_of, move_to_uci, parse_fen, parse_uci_move, san_plus};
use chess_puzzler::{CandidateMove, Engine, EngineError, Eval, Score};

/// Rook-roller mate: 1... h5?? 2. Rb7+ Kf8 3. Ra8#
pub const MATE_GAME: &str = r#"[Event "Rook roller"]
[White "Alice"]
[Black "Bob"]
[Result "1-0"]
[SetUp "1"]
[FEN "8/4k3/R6p/1R6/8/8/8/6K1 b - - 0 1"]

1... h5 2. Rb7+ Kf8 3. Ra8# 1-0
"#;

/// Knight fork: 1... h6?? 2. Nc7+ Kd7 3. Nxa8
pub const FORK_GAME: &str = r#"[Event "Fork"]
[White "Carol"]
[Black "Dave"]
[Result "*"]
[SetUp "1"]
[FEN "r3k3/5ppp/8/3N4/8/8/5PPP/6K1 b - - 0 1"]

1... h6 2. Nc7+ Kd7 3. Nxa8 *
"#;

pub const MATE_BEFORE: &str = "8/4k3/R6p/1R6/8/8/8/6K1 b - - 0 1";
pub const MATE_START: &str = "8/4k3/R7/1R5p/8/8/8/6K1 w - - 0 2";
pub const MATE_AFTER_CHECK: &str = "8/1R2k3/R7/7p/8/8/8/6K1 b - - 1 2";
pub const MATE_FINAL_MOVE: &str = "5k2/1R6/R7/7p/8/8/8/6K1 w - - 2 3";

pub const FORK_BEFORE: &str = "r3k3/5ppp/8/3N4/8/8/5PPP/6K1 b - - 0 1";
pub const FORK_START: &str = "r3k3/5pp1/7p/3N4/8/8/5PPP/6K1 w - - 0 2";
pub const FORK_AFTER_CHECK: &str = "r3k3/2N2pp1/7p/8/8/8/5PPP/6K1 b - - 1 2";
pub const FORK_CAPTURE: &str = "r7/2Nk1pp1/7p/8/8/8/5PPP/6K1 w - - 2 3";

/// Position key without move clocks
fn key(pos: &Chess) -> String {
    fen_of(pos)
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Engine double answering from a table of positions. Each entry lists
/// `(uci, eval)` pairs, best first, with evals relative to the side to move.
pub struct ScriptedEngine {
    script: HashMap<String, Vec<(String, Eval)>>,
    /// Answer for unscripted positions: first legal move with this eval
    fallback: Option<Eval>,
    /// `evaluate_move` answers with a protocol error
    failing_evaluate: bool,
    pub searches: usize,
    pub evaluations: usize,
    pub new_games: usize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            script: HashMap::new(),
            fallback: None,
            failing_evaluate: false,
            searches: 0,
            evaluations: 0,
            new_games: 0,
        }
    }

    pub fn with(mut self, fen: &str, lines: &[(&str, Eval)]) -> Self {
        let pos = parse_fen(fen).expect("scripted FEN");
        let lines = lines.iter().map(|(u, e)| (u.to_string(), *e)).collect();
        self.script.insert(key(&pos), lines);
        self
    }

    pub fn with_fallback(mut self, eval: Eval) -> Self {
        self.fallback = Some(eval);
        self
    }

    pub fn with_failing_evaluate(mut self) -> Self {
        self.failing_evaluate = true;
        self
    }

    /// Scripted answers for the rook-roller mate
    pub fn mate_script(self) -> Self {
        self.with(MATE_BEFORE, &[("h6h5", Eval::Cp(0))])
            .with(MATE_START, &[("b5b7", Eval::Mate(2)), ("a6a7", Eval::Mate(2))])
            .with(
                MATE_AFTER_CHECK,
                &[
                    ("e7f8", Eval::Mate(-1)),
                    ("e7e8", Eval::Mate(-1)),
                    ("e7d8", Eval::Mate(-1)),
                ],
            )
            .with(MATE_FINAL_MOVE, &[("a6a8", Eval::Mate(1)), ("b7b8", Eval::Cp(450))])
    }

    /// Scripted answers for the knight fork
    pub fn fork_script(self) -> Self {
        self.with(FORK_BEFORE, &[("h7h6", Eval::Cp(20))])
            .with(FORK_START, &[("d5c7", Eval::Cp(550)), ("d5f6", Eval::Cp(40))])
            .with(
                FORK_AFTER_CHECK,
                &[
                    ("e8d7", Eval::Cp(-560)),
                    ("e8d8", Eval::Cp(-580)),
                    ("e8e7", Eval::Cp(-600)),
                ],
            )
            .with(FORK_CAPTURE, &[("c7a8", Eval::Cp(600)), ("c7b5", Eval::Cp(-150))])
    }

    fn lines(&self, pos: &Chess) -> Vec<CandidateMove> {
        let entries = match (self.script.get(&key(pos)), self.fallback) {
            (Some(lines), _) => lines.clone(),
            (None, Some(eval)) => pos
                .legal_moves()
                .first()
                .map(|mv| vec![(move_to_uci(mv), eval)])
                .unwrap_or_default(),
            (None, None) => Vec::new(),
        };
        entries
            .into_iter()
            .map(|(uci, eval)| {
                let mv = parse_uci_move(pos, &uci).expect("scripted move must be legal");
                CandidateMove {
                    san: san_plus(pos, &mv),
                    uci,
                    mv,
                    score: Score::new(eval, pos.turn()),
                }
            })
            .collect()
    }
}

impl Engine for ScriptedEngine {
    fn name(&self) -> &str {
        "Scripted"
    }

    fn new_game(&mut self) -> impl Future<Output = Result<(), EngineError>> + Send {
        self.new_games += 1;
        async { Ok(()) }
    }

    fn best_moves(
        &mut self,
        pos: &Chess,
        _depth: u32,
        count: usize,
    ) -> impl Future<Output = Result<Vec<CandidateMove>, EngineError>> + Send {
        self.searches += 1;
        let mut lines = self.lines(pos);
        lines.truncate(count);
        async move { Ok(lines) }
    }

    fn evaluate_move(
        &mut self,
        pos: &Chess,
        mv: &Move,
        _depth: u32,
    ) -> impl Future<Output = Result<Option<CandidateMove>, EngineError>> + Send {
        self.searches += 1;
        self.evaluations += 1;
        let result = if self.failing_evaluate {
            Err(EngineError::Protocol(format!(
                "searchmoves {} answered with another move",
                move_to_uci(mv)
            )))
        } else {
            Ok(self.lines(pos).into_iter().find(|c| &c.mv == mv))
        };
        async move { result }
    }
}

/// Locate a Stockfish binary: STOCKFISH_PATH, then `stockfish` on PATH
pub fn find_stockfish() -> Option<String> {
    use std::process::{Command, Stdio};

    if let Ok(path) = std::env::var("STOCKFISH_PATH") {
        if std::path::Path::new(&path).exists() {
            return Some(path);
        }
    }
    let on_path = Command::new("stockfish")
        .arg("quit")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok();
    on_path.then(|| "stockfish".to_string())
}
