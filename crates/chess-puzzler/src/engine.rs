//! Engine adapter contract.
//!
//! The scanner and the line builder only talk to an engine through this
//! trait, so a UCI process and a scripted test double are interchangeable.
//! Methods return `impl Future + Send` instead of using `async fn` so the
//! futures stay `Send` for the tokio runtime.

use std::future::Future;

use shakmaty::{Chess, Move};

use crate::error::EngineError;
use crate::score::Score;

/// One ranked engine suggestion
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMove {
    pub mv: Move,
    pub uci: String,
    /// SAN with check suffix, as it appears in exported annotations
    pub san: String,
    /// Score from the point of view of the side making the move
    pub score: Score,
}

pub trait Engine: Send {
    /// Identifier reported by the engine (`id name ...`)
    fn name(&self) -> &str;

    /// Reset per-game engine state
    fn new_game(&mut self) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Up to `count` best moves, best first. Empty when the position has no
    /// legal moves or the engine produced no principal variation.
    fn best_moves(
        &mut self,
        pos: &Chess,
        depth: u32,
        count: usize,
    ) -> impl Future<Output = Result<Vec<CandidateMove>, EngineError>> + Send;

    /// Search restricted to a single root move
    fn evaluate_move(
        &mut self,
        pos: &Chess,
        mv: &Move,
        depth: u32,
    ) -> impl Future<Output = Result<Option<CandidateMove>, EngineError>> + Send;

    fn best_move(
        &mut self,
        pos: &Chess,
        depth: u32,
    ) -> impl Future<Output = Result<Option<CandidateMove>, EngineError>> + Send {
        async move { Ok(self.best_moves(pos, depth, 1).await?.into_iter().next()) }
    }
}
