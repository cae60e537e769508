//! Stockfish engine wrapper using UCI protocol (async I/O)

use std::future::Future;

use shakmaty::{Chess, Move, Position};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use chess_core::board::{fen_of, is_terminal, move_to_uci, parse_uci_move, san_plus};
use chess_puzzler::{CandidateMove, Engine, EngineError, Score};

/// Process settings applied at startup
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub path: String,
    pub threads: usize,
    /// Hash table size in MB
    pub hash_mb: usize,
}

/// A single PV line from multi-PV analysis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PvLine {
    /// Principal variation moves
    pub pv: Vec<String>,
    /// Centipawn score
    pub cp: Option<i32>,
    /// Mate in N
    pub mate: Option<i32>,
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    name: String,
    multipv: usize,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub async fn new(options: &EngineOptions) -> Result<Self, EngineError> {
        let mut process = Command::new(&options.path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Spawn(format!("{}: {e}", options.path)))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("engine stdin unavailable".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("engine stdout unavailable".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            name: options.path.clone(),
            multipv: 1,
        };

        // Initialize UCI, picking up the engine's name on the way
        engine.send("uci").await?;
        loop {
            let line = engine.read_line().await?;
            if let Some(name) = line.strip_prefix("id name ") {
                engine.name = name.trim().to_string();
            } else if line == "uciok" {
                break;
            }
        }

        // Configure for analysis
        engine
            .send(&format!("setoption name Threads value {}", options.threads))
            .await?;
        engine
            .send(&format!("setoption name Hash value {}", options.hash_mb))
            .await?;
        engine.send("setoption name UCI_AnalyseMode value true").await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "SF <");
        self.stdin.write_all(format!("{cmd}\n").as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Read one trimmed line; end of output is an error
    async fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        if self.stdout.read_line(&mut line).await? == 0 {
            return Err(EngineError::Closed);
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "SF >");
        Ok(trimmed)
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), EngineError> {
        while self.read_line().await? != expected {}
        Ok(())
    }

    async fn set_multipv(&mut self, multipv: usize) -> Result<(), EngineError> {
        if self.multipv != multipv {
            self.send(&format!("setoption name MultiPV value {multipv}")).await?;
            self.multipv = multipv;
        }
        Ok(())
    }

    /// Search a position and collect the final line for each multipv slot,
    /// best first
    async fn search(
        &mut self,
        pos: &Chess,
        depth: u32,
        multipv: usize,
        searchmoves: Option<&str>,
    ) -> Result<Vec<PvLine>, EngineError> {
        self.set_multipv(multipv).await?;
        self.send(&format!("position fen {}", fen_of(pos))).await?;
        match searchmoves {
            Some(uci) => self.send(&format!("go depth {depth} searchmoves {uci}")).await?,
            None => self.send(&format!("go depth {depth}")).await?,
        }

        let mut lines: Vec<PvLine> = vec![PvLine::default(); multipv];
        loop {
            let line = self.read_line().await?;
            if line.starts_with("info") && line.contains(" pv ") {
                // Bound scores are provisional
                if line.contains("lowerbound") || line.contains("upperbound") {
                    continue;
                }
                let pv_idx = parse_multipv_index(&line).unwrap_or(1).saturating_sub(1);
                if let Some(entry) = lines.get_mut(pv_idx) {
                    entry.cp = parse_cp(&line);
                    entry.mate = parse_mate(&line);
                    entry.pv = parse_pv(&line);
                }
            } else if line.starts_with("bestmove") {
                break;
            }
        }

        Ok(lines.into_iter().filter(|l| !l.pv.is_empty()).collect())
    }

    fn to_candidate(pos: &Chess, line: &PvLine) -> Result<CandidateMove, EngineError> {
        let uci = line.pv.first().cloned().unwrap_or_default();
        let mv = parse_uci_move(pos, &uci).ok_or_else(|| EngineError::IllegalMove {
            uci: uci.clone(),
            fen: fen_of(pos),
        })?;
        let score = Score::from_uci(line.cp, line.mate, pos.turn())?;
        Ok(CandidateMove {
            san: san_plus(pos, &mv),
            uci,
            mv,
            score,
        })
    }

    /// Send quit command and wait for process to exit
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

impl Engine for StockfishEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn new_game(&mut self) -> impl Future<Output = Result<(), EngineError>> + Send {
        async move {
            self.send("ucinewgame").await?;
            self.send("isready").await?;
            self.wait_for("readyok").await
        }
    }

    fn best_moves(
        &mut self,
        pos: &Chess,
        depth: u32,
        count: usize,
    ) -> impl Future<Output = Result<Vec<CandidateMove>, EngineError>> + Send {
        async move {
            if is_terminal(pos) || count == 0 {
                return Ok(Vec::new());
            }
            let lines = self.search(pos, depth, count, None).await?;
            lines.iter().map(|l| Self::to_candidate(pos, l)).collect()
        }
    }

    fn evaluate_move(
        &mut self,
        pos: &Chess,
        mv: &Move,
        depth: u32,
    ) -> impl Future<Output = Result<Option<CandidateMove>, EngineError>> + Send {
        let uci = move_to_uci(mv);
        async move {
            if is_terminal(pos) {
                return Ok(None);
            }
            let lines = self.search(pos, depth, 1, Some(uci.as_str())).await?;
            let Some(line) = lines.first() else {
                return Ok(None);
            };
            let candidate = Self::to_candidate(pos, line)?;
            if candidate.uci != uci {
                return Err(EngineError::Protocol(format!(
                    "searchmoves {uci} answered with {}",
                    candidate.uci
                )));
            }
            Ok(Some(candidate))
        }
    }
}

/// Value following `key` in an info line
fn parse_field<T: std::str::FromStr>(line: &str, key: &str) -> Option<T> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    for (i, part) in parts.iter().enumerate() {
        if *part == key && i + 1 < parts.len() {
            return parts[i + 1].parse().ok();
        }
    }
    None
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    parse_field(line, "cp")
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    parse_field(line, "mate")
}

/// Parse multipv index from info line
fn parse_multipv_index(line: &str) -> Option<usize> {
    parse_field(line, "multipv")
}

/// Parse PV moves from info line
fn parse_pv(line: &str) -> Vec<String> {
    let mut parts = line.split_whitespace().skip_while(|p| *p != "pv");
    parts.next();
    parts
        .take_while(|p| !p.starts_with("bmc") && *p != "string")
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cp() {
        let line = "info depth 20 seldepth 25 multipv 1 score cp 35 nodes 100000 pv e2e4";
        assert_eq!(parse_cp(line), Some(35));
        assert_eq!(parse_mate(line), None);
    }

    #[test]
    fn test_parse_mate() {
        let line = "info depth 20 score mate -3 nodes 100000 pv e2e4";
        assert_eq!(parse_mate(line), Some(-3));
    }

    #[test]
    fn test_parse_multipv_index() {
        let line = "info depth 12 multipv 3 score cp -12 pv d2d4";
        assert_eq!(parse_multipv_index(line), Some(3));
        assert_eq!(parse_multipv_index("info depth 1 pv e2e4"), None);
    }

    #[test]
    fn test_parse_pv() {
        let line = "info depth 20 score cp 35 pv e2e4 e7e5 g1f3";
        let pv = parse_pv(line);
        assert_eq!(pv, vec!["e2e4", "e7e5", "g1f3"]);
        assert!(parse_pv("info depth 20 score cp 35").is_empty());
    }

    #[test]
    fn test_to_candidate() {
        let pos = chess_core::board::parse_fen("8/4k3/R7/1R5p/8/8/8/6K1 w - - 0 2").unwrap();
        let line = PvLine {
            pv: vec!["b5b7".into(), "e7f8".into()],
            cp: None,
            mate: Some(2),
        };
        let candidate = StockfishEngine::to_candidate(&pos, &line).unwrap();
        assert_eq!(candidate.san, "Rb7+");
        assert_eq!(candidate.score, Score::mate(2, shakmaty::Color::White));

        let bad = PvLine {
            pv: vec!["a1a2".into()],
            cp: Some(0),
            mate: None,
        };
        assert!(matches!(
            StockfishEngine::to_candidate(&pos, &bad),
            Err(EngineError::IllegalMove { .. })
        ));
    }
}
