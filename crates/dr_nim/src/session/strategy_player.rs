//! A view that plays by itself.
//!
//! Sits in the local seat of a session and answers every
//! "your turn" with the strategy's move. This is how Dr. Nim serves
//! networked challengers.

use super::event::SessionHandle;
use super::observer::StateObserver;
use dr_nim_core::{GameState, OpponentStrategy, Side};
use tracing::{debug, info, instrument, warn};

/// Local player driven by an [`OpponentStrategy`].
#[derive(Debug)]
pub struct StrategyPlayer {
    strategy: Box<dyn OpponentStrategy>,
    handle: SessionHandle,
    marbles: u8,
}

impl StrategyPlayer {
    /// Creates a player that submits its moves through `handle`.
    #[instrument(skip_all, fields(strategy = strategy.name()))]
    pub fn new(strategy: Box<dyn OpponentStrategy>, handle: SessionHandle) -> Self {
        Self {
            strategy,
            handle,
            marbles: 0,
        }
    }
}

impl StateObserver for StrategyPlayer {
    fn display(&mut self, marbles: u8) {
        self.marbles = marbles;
    }

    fn player_turn(&mut self) {}

    fn dim_turn(&mut self) {}

    fn player_win(&mut self) {
        info!(player = self.strategy.name(), "Won the game");
    }

    fn dim_win(&mut self) {
        info!(player = self.strategy.name(), "Lost the game");
    }

    fn empty_text(&mut self) {}

    fn enable_buttons(&mut self) {
        let state = GameState::new(self.marbles, Side::Local);
        let mv = self.strategy.choose_move(&state);
        debug!(player = self.strategy.name(), marbles = self.marbles, %mv, "Playing");
        if let Err(err) = self.handle.submit(mv) {
            warn!(error = %err, "Could not submit move");
        }
    }

    fn disable_buttons(&mut self) {}

    fn io_error(&mut self, message: &str) {
        warn!(player = self.strategy.name(), %message, "Session lost");
    }
}
