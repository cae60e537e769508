//! Per-game analysis: scan for blunders, build puzzle lines, keep the
//! complete ones.

use std::fs::File;
use std::io::BufReader;

use shakmaty::Chess;
use tracing::{info, warn};

use chess_core::board::fen_of;
use chess_core::{GameRecord, PgnGames};
use chess_puzzler::{scan_game, Engine, Puzzle, PuzzleError};

use crate::config::{Input, WorkerConfig};
use crate::error::WorkerError;
use crate::output::PuzzleWriter;

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub games: usize,
    pub skipped_games: usize,
    pub candidates: usize,
    pub puzzles: usize,
}

/// Engine failures abort the run; other puzzle errors only skip their item
fn fatal(e: PuzzleError) -> Result<PuzzleError, WorkerError> {
    if e.is_fatal() {
        Err(e.into())
    } else {
        Ok(e)
    }
}

/// Build a puzzle line and write it if it is complete
async fn finish_puzzle<E: Engine>(
    engine: &mut E,
    config: &WorkerConfig,
    mut puzzle: Puzzle,
    writer: &mut PuzzleWriter,
    stats: &mut RunStats,
) -> Result<(), WorkerError> {
    if let Err(e) = puzzle.generate(engine, &config.build).await {
        let e = fatal(e)?;
        warn!(id = %puzzle.id, error = %e, "Puzzle skipped");
        return Ok(());
    }

    if puzzle.is_complete() {
        info!(
            id = %puzzle.id,
            category = %puzzle.category(),
            plies = puzzle.nodes.len(),
            "Puzzle complete"
        );
        writer.write(&puzzle)?;
        stats.puzzles += 1;
    } else {
        info!(
            id = %puzzle.id,
            category = %puzzle.category(),
            plies = puzzle.nodes.len(),
            termination = ?puzzle.termination,
            "Puzzle incomplete"
        );
    }
    Ok(())
}

/// Scan one game and build a puzzle from every flagged move
pub async fn process_game<E: Engine>(
    engine: &mut E,
    config: &WorkerConfig,
    game: &GameRecord,
    writer: &mut PuzzleWriter,
    stats: &mut RunStats,
) -> Result<(), WorkerError> {
    engine.new_game().await?;

    let candidates = match scan_game(engine, game, config.scan_depth).await {
        Ok(candidates) => candidates,
        Err(e) => {
            let e = fatal(e)?;
            warn!(game = %game.id(), error = %e, "Game skipped");
            stats.skipped_games += 1;
            return Ok(());
        }
    };
    stats.games += 1;
    stats.candidates += candidates.len();
    info!(game = %game.id(), moves = game.moves.len(), candidates = candidates.len(), "Game scanned");

    for candidate in &candidates {
        if config.scan_only {
            info!(
                game = %game.id(),
                ply = candidate.ply,
                fen = %fen_of(&candidate.position),
                blunder = %candidate.san,
                before = %candidate.before,
                after = %candidate.after,
                "Blunder candidate"
            );
            continue;
        }
        let puzzle = Puzzle::from_candidate(game, candidate);
        finish_puzzle(engine, config, puzzle, writer, stats).await?;
    }
    Ok(())
}

/// Build a single puzzle starting at `position`
pub async fn process_position<E: Engine>(
    engine: &mut E,
    config: &WorkerConfig,
    position: &Chess,
    writer: &mut PuzzleWriter,
    stats: &mut RunStats,
) -> Result<(), WorkerError> {
    engine.new_game().await?;
    let puzzle = Puzzle::from_position(fen_of(position), position.clone());
    finish_puzzle(engine, config, puzzle, writer, stats).await
}

/// Process the configured input and write every complete puzzle
pub async fn run<E: Engine>(engine: &mut E, config: &WorkerConfig) -> Result<RunStats, WorkerError> {
    let mut writer = PuzzleWriter::create(&config.output, engine.name())?;
    let mut stats = RunStats::default();

    match &config.input {
        Input::Position(position) => {
            process_position(engine, config, position, &mut writer, &mut stats).await?;
        }
        Input::Games(paths) => {
            for path in paths {
                info!(path = %path.display(), "Reading games");
                let reader = BufReader::new(File::open(path)?);
                for game in PgnGames::new(reader) {
                    match game {
                        Ok(game) => {
                            process_game(engine, config, &game, &mut writer, &mut stats).await?
                        }
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "Game skipped");
                            stats.skipped_games += 1;
                        }
                    }
                }
            }
        }
    }

    if let Some(summary) = &config.summary {
        writer.write_summary(summary)?;
    }

    info!(
        games = stats.games,
        skipped = stats.skipped_games,
        candidates = stats.candidates,
        puzzles = writer.count(),
        "Run complete"
    );
    Ok(stats)
}
