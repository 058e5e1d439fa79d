//! Tests for Dr. Nim's optimal play.

use dr_nim_core::{
    GameState, GameStatus, MatchRules, Move, OpponentStrategy, OptimalStrategy, PassRule,
    RuleEngine, Side, WinRule,
};

/// Plays both sides with `strategy` until the heap is empty.
fn self_play(rules: MatchRules, strategy: &OptimalStrategy) -> GameState {
    let engine = rules.engine();
    let mut state = rules.opening_state();

    while !state.is_over() {
        let side = state.turn();
        let mv = strategy.choose_move(&state);
        engine.apply(&mut state, side, mv).expect("Strategy plays legal moves");
    }

    state
}

#[test]
fn test_strategy_restores_multiple_of_four() {
    let strategy = OptimalStrategy::new(WinRule::Standard);

    for marbles in (1..=15u8).filter(|m| m % 4 != 0) {
        let state = GameState::new(marbles, Side::Remote);
        let mv = strategy.choose_move(&state);

        assert_eq!(mv.taken(), marbles % 4);
        assert_eq!((marbles - mv.taken()) % 4, 0);
    }
}

#[test]
fn test_strategy_takes_one_from_losing_position() {
    let strategy = OptimalStrategy::new(WinRule::Standard);

    for marbles in [4u8, 8, 12] {
        let state = GameState::new(marbles, Side::Remote);
        assert_eq!(strategy.choose_move(&state), Move::TakeOne);
    }
}

#[test]
fn test_opener_wins_from_fifteen_standard() {
    let rules = MatchRules {
        first: Side::Remote,
        ..MatchRules::default()
    };
    let state = self_play(rules, &OptimalStrategy::new(WinRule::Standard));

    assert_eq!(state.marbles(), 0);
    assert_eq!(state.status(), GameStatus::RemoteWon);
    // Every reply by the opener leaves a multiple of four.
    for (i, play) in state.history().iter().enumerate() {
        if play.side == Side::Remote {
            let before: u8 = 15 - state.history()[..i].iter().map(|p| p.mv.taken()).sum::<u8>();
            assert_eq!((before - play.mv.taken()) % 4, 0);
        }
    }
}

#[test]
fn test_opener_wins_from_fifteen_misere() {
    let rules = MatchRules {
        first: Side::Local,
        win_rule: WinRule::Misere,
        ..MatchRules::default()
    };
    let state = self_play(rules, &OptimalStrategy::new(WinRule::Misere));

    assert_eq!(state.marbles(), 0);
    assert_eq!(state.status(), GameStatus::LocalWon);
    // Under misère the loser is the one who took the last marble.
    let last = state.history().last().expect("Game has plays");
    assert_eq!(last.side, Side::Remote);
}

#[test]
fn test_opening_pass_hands_dr_nim_the_win() {
    let rules = MatchRules {
        pass_rule: PassRule::Opening,
        ..MatchRules::default()
    };
    let engine: RuleEngine = rules.engine();
    let strategy = OptimalStrategy::default();
    let mut state = rules.opening_state();

    engine
        .apply(&mut state, Side::Local, Move::Pass)
        .expect("Opening pass");

    while !state.is_over() {
        let side = state.turn();
        let mv = strategy.choose_move(&state);
        engine.apply(&mut state, side, mv).expect("Legal move");
    }

    assert_eq!(state.status(), GameStatus::RemoteWon);
}

#[test]
fn test_end_to_end_local_restores_multiples_of_four() {
    let engine = RuleEngine::default();
    let dr_nim = OptimalStrategy::default();
    let mut state = GameState::standard(Side::Local);

    engine
        .apply(&mut state, Side::Local, Move::TakeThree)
        .expect("Opening take");
    assert_eq!(state.marbles(), 12);

    let reply = dr_nim.choose_move(&state);
    assert_eq!(reply, Move::TakeOne);
    engine.apply(&mut state, Side::Remote, reply).expect("Reply");
    assert_eq!(state.marbles(), 11);

    while !state.is_over() {
        let local = Move::take(state.marbles() % 4).expect("Local keeps the edge");
        engine.apply(&mut state, Side::Local, local).expect("Local take");
        if state.is_over() {
            break;
        }
        let reply = dr_nim.choose_move(&state);
        engine.apply(&mut state, Side::Remote, reply).expect("Reply");
    }

    assert_eq!(state.marbles(), 0);
    assert_eq!(state.status(), GameStatus::LocalWon);
}
