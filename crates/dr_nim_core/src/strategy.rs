//! Dr. Nim's side of the table.

use crate::action::Move;
use crate::rules::WinRule;
use crate::types::GameState;
use derive_new::new;
use tracing::{debug, instrument};

/// Something that picks the computer's counter-move.
///
/// Callers only ask when it is the computer's turn and the game is in
/// progress; implementations never look at whose turn it is.
pub trait OpponentStrategy: std::fmt::Debug + Send + Sync {
    /// Chooses the next move for `state`.
    fn choose_move(&self, state: &GameState) -> Move;

    /// Returns the strategy's display name.
    fn name(&self) -> &str;
}

/// Textbook play for a single heap with takes of 1..=3.
///
/// Under standard play it hands the opponent a multiple of four whenever
/// it can; under misère it hands over one more than a multiple of four.
/// From a lost position it takes a single marble to drag the game out.
#[derive(Debug, Clone, Copy, Default, new)]
pub struct OptimalStrategy {
    win_rule: WinRule,
}

impl OptimalStrategy {
    /// Marbles to take from a heap of `marbles`.
    pub fn take_for(&self, marbles: u8) -> u8 {
        let target = self.win_rule.losing_residue();
        let excess = (marbles % 4 + 4 - target) % 4;
        if excess == 0 { 1 } else { excess }
    }
}

impl OpponentStrategy for OptimalStrategy {
    #[instrument(skip(state), fields(marbles = state.marbles()))]
    fn choose_move(&self, state: &GameState) -> Move {
        if state.marbles() == 0 {
            return Move::Pass;
        }

        let count = self.take_for(state.marbles()).min(state.marbles());
        let mv = Move::take(count).unwrap_or(Move::TakeOne);
        debug!(%mv, "Dr. Nim chose move");
        mv
    }

    fn name(&self) -> &str {
        "Dr. Nim"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;

    #[test]
    fn standard_takes_remainder() {
        let strategy = OptimalStrategy::new(WinRule::Standard);
        assert_eq!(strategy.take_for(15), 3);
        assert_eq!(strategy.take_for(6), 2);
        assert_eq!(strategy.take_for(5), 1);
    }

    #[test]
    fn standard_losing_position_takes_one() {
        let strategy = OptimalStrategy::new(WinRule::Standard);
        assert_eq!(strategy.take_for(12), 1);
        assert_eq!(strategy.take_for(4), 1);
    }

    #[test]
    fn misere_leaves_one_past_multiple_of_four() {
        let strategy = OptimalStrategy::new(WinRule::Misere);
        assert_eq!(strategy.take_for(15), 2);
        assert_eq!(strategy.take_for(4), 3);
        assert_eq!(strategy.take_for(2), 1);
        assert_eq!(strategy.take_for(1), 1);
        assert_eq!(strategy.take_for(13), 1);
    }

    #[test]
    fn take_for_handles_any_heap_size() {
        assert_eq!(OptimalStrategy::new(WinRule::Standard).take_for(u8::MAX), 3);
        assert_eq!(OptimalStrategy::new(WinRule::Misere).take_for(u8::MAX), 2);
        assert_eq!(OptimalStrategy::new(WinRule::Standard).take_for(252), 1);
    }

    #[test]
    fn choose_move_never_overdraws() {
        let strategy = OptimalStrategy::new(WinRule::Misere);
        for marbles in 1..=15 {
            let mv = strategy.choose_move(&GameState::new(marbles, Side::Remote));
            assert!(mv.taken() >= 1 && mv.taken() <= marbles);
        }
    }
}
