//! Game rules for Dr. Nim.
//!
//! The rule engine is the only writer of [`GameState`]. It is pure:
//! the same state and move always give the same result, and a rejected
//! move leaves the caller's state untouched.

pub mod pass;
pub mod win;

pub use pass::PassRule;
pub use win::WinRule;

use crate::action::Move;
use crate::types::{GameState, MAX_MARBLES, Side};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Error returned when a move is illegal for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Rejection {
    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// It's not this side's turn.
    #[display("It's not {}'s turn", _0)]
    WrongTurn(Side),

    /// The heap holds fewer marbles than requested.
    #[display("Cannot take {} marbles, only {} left", requested, remaining)]
    NotEnoughMarbles {
        /// Marbles the move asked for.
        requested: u8,
        /// Marbles left on the heap.
        remaining: u8,
    },

    /// The pass rule forbids passing here.
    #[display("Passing is not allowed now")]
    PassNotAllowed,
}

impl std::error::Error for Rejection {}

/// Rules a match is played under.
///
/// `first` is always relative to the process holding the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Starting heap size.
    pub marbles: u8,
    /// Side that opens the game.
    pub first: Side,
    /// Who wins on an empty heap.
    pub win_rule: WinRule,
    /// When passing is legal.
    pub pass_rule: PassRule,
}

impl MatchRules {
    /// Returns the same rules seen from the other side of the table.
    pub fn mirrored(self) -> Self {
        Self {
            first: self.first.opponent(),
            ..self
        }
    }

    /// Creates the opening state for these rules.
    pub fn opening_state(&self) -> GameState {
        GameState::new(self.marbles, self.first)
    }

    /// Creates the rule engine for these rules.
    pub fn engine(&self) -> RuleEngine {
        RuleEngine::new(self.win_rule, self.pass_rule)
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            marbles: MAX_MARBLES,
            first: Side::Local,
            win_rule: WinRule::default(),
            pass_rule: PassRule::default(),
        }
    }
}

/// Validates moves and computes the resulting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, new)]
pub struct RuleEngine {
    win_rule: WinRule,
    pass_rule: PassRule,
}

impl RuleEngine {
    /// Returns the win rule in force.
    pub fn win_rule(&self) -> WinRule {
        self.win_rule
    }

    /// Returns the pass rule in force.
    pub fn pass_rule(&self) -> PassRule {
        self.pass_rule
    }

    /// Checks that `side` may play `mv` in `state`.
    #[instrument(skip(state), fields(marbles = state.marbles(), turn = %state.turn()))]
    pub fn check(&self, state: &GameState, side: Side, mv: Move) -> Result<(), Rejection> {
        if state.is_over() {
            return Err(Rejection::GameOver);
        }

        if side != state.turn() {
            return Err(Rejection::WrongTurn(side));
        }

        match mv {
            Move::Pass if !self.pass_rule.permits(state) => Err(Rejection::PassNotAllowed),
            Move::Pass => Ok(()),
            take if take.taken() > state.marbles() => Err(Rejection::NotEnoughMarbles {
                requested: take.taken(),
                remaining: state.marbles(),
            }),
            _ => Ok(()),
        }
    }

    /// Validates `mv` for `side` and returns the state it leads to.
    ///
    /// The input state is never modified.
    #[instrument(skip(state), fields(marbles = state.marbles()))]
    pub fn validate(&self, state: &GameState, side: Side, mv: Move) -> Result<GameState, Rejection> {
        self.check(state, side, mv).inspect_err(|rejection| {
            warn!(%rejection, "Move rejected");
        })?;

        let mut next = state.clone();
        next.apply_move(side, mv);

        if next.marbles() == 0 {
            let status = self.win_rule.outcome(side);
            info!(?status, last_mover = %side, "Heap emptied");
            next.set_status(status);
        }

        debug!(marbles = next.marbles(), turn = %next.turn(), "Move validated");
        Ok(next)
    }

    /// Validates `mv` and replaces `state` with the result.
    ///
    /// On rejection `state` is left exactly as it was.
    #[instrument(skip(state))]
    pub fn apply(&self, state: &mut GameState, side: Side, mv: Move) -> Result<(), Rejection> {
        *state = self.validate(state, side, mv)?;
        Ok(())
    }

    /// Moves `side` could legally make in `state`.
    pub fn legal_moves(&self, state: &GameState, side: Side) -> Vec<Move> {
        [Move::TakeOne, Move::TakeTwo, Move::TakeThree, Move::Pass]
            .into_iter()
            .filter(|mv| self.check(state, side, *mv).is_ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameStatus;

    #[test]
    fn take_reduces_heap_and_flips_turn() {
        let engine = RuleEngine::default();
        let state = GameState::standard(Side::Local);
        let next = engine
            .validate(&state, Side::Local, Move::TakeThree)
            .expect("legal move");
        assert_eq!(next.marbles(), 12);
        assert_eq!(next.turn(), Side::Remote);
        assert_eq!(next.status(), GameStatus::InProgress);
    }

    #[test]
    fn wrong_turn_rejected() {
        let engine = RuleEngine::default();
        let state = GameState::standard(Side::Local);
        assert_eq!(
            engine.validate(&state, Side::Remote, Move::TakeOne),
            Err(Rejection::WrongTurn(Side::Remote))
        );
    }

    #[test]
    fn overdraw_rejected() {
        let engine = RuleEngine::default();
        let state = GameState::new(2, Side::Local);
        assert_eq!(
            engine.validate(&state, Side::Local, Move::TakeThree),
            Err(Rejection::NotEnoughMarbles {
                requested: 3,
                remaining: 2
            })
        );
    }

    #[test]
    fn pass_follows_pass_rule() {
        let state = GameState::standard(Side::Local);

        let strict = RuleEngine::new(WinRule::Standard, PassRule::Never);
        assert_eq!(
            strict.validate(&state, Side::Local, Move::Pass),
            Err(Rejection::PassNotAllowed)
        );

        let opening = RuleEngine::new(WinRule::Standard, PassRule::Opening);
        let next = opening
            .validate(&state, Side::Local, Move::Pass)
            .expect("opening pass");
        assert_eq!(next.marbles(), 15);
        assert_eq!(next.turn(), Side::Remote);
        assert_eq!(
            opening.validate(&next, Side::Remote, Move::Pass),
            Err(Rejection::PassNotAllowed)
        );
    }

    #[test]
    fn emptying_heap_ends_game() {
        let engine = RuleEngine::default();
        let state = GameState::new(2, Side::Remote);
        let next = engine
            .validate(&state, Side::Remote, Move::TakeTwo)
            .expect("legal move");
        assert_eq!(next.marbles(), 0);
        assert_eq!(next.status(), GameStatus::RemoteWon);
        assert_eq!(
            engine.validate(&next, Side::Local, Move::TakeOne),
            Err(Rejection::GameOver)
        );
    }

    #[test]
    fn misere_last_taker_loses() {
        let engine = RuleEngine::new(WinRule::Misere, PassRule::Never);
        let state = GameState::new(1, Side::Local);
        let next = engine
            .validate(&state, Side::Local, Move::TakeOne)
            .expect("legal move");
        assert_eq!(next.status(), GameStatus::RemoteWon);
    }

    #[test]
    fn legal_moves_shrink_with_heap() {
        let engine = RuleEngine::default();
        let state = GameState::new(2, Side::Local);
        assert_eq!(
            engine.legal_moves(&state, Side::Local),
            vec![Move::TakeOne, Move::TakeTwo]
        );
        assert!(engine.legal_moves(&state, Side::Remote).is_empty());
    }

    #[test]
    fn mirrored_rules_swap_opener() {
        let rules = MatchRules::default();
        assert_eq!(rules.mirrored().first, Side::Remote);
        assert_eq!(rules.mirrored().mirrored(), rules);
    }
}
