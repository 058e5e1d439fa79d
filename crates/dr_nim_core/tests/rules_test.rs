//! Tests for move validation across every heap size.

use dr_nim_core::{GameState, GameStatus, Move, PassRule, Rejection, RuleEngine, Side, WinRule};

const TAKES: [Move; 3] = [Move::TakeOne, Move::TakeTwo, Move::TakeThree];

#[test]
fn test_legal_takes_reduce_heap_and_flip_turn() {
    let engine = RuleEngine::default();

    for marbles in 1..=15u8 {
        for mv in TAKES.into_iter().filter(|mv| mv.taken() <= marbles) {
            let state = GameState::new(marbles, Side::Local);
            let next = engine.validate(&state, Side::Local, mv).expect("Legal take");

            assert_eq!(next.marbles(), marbles - mv.taken());
            assert_eq!(next.turn(), Side::Remote);
            assert_eq!(next.history().len(), 1);
        }
    }
}

#[test]
fn test_overdraw_rejected() {
    let engine = RuleEngine::default();

    for marbles in 1..=2u8 {
        for mv in TAKES.into_iter().filter(|mv| mv.taken() > marbles) {
            let state = GameState::new(marbles, Side::Local);
            assert!(matches!(
                engine.validate(&state, Side::Local, mv),
                Err(Rejection::NotEnoughMarbles { .. })
            ));
        }
    }
}

#[test]
fn test_finished_game_rejects_everything() {
    let engine = RuleEngine::new(WinRule::Standard, PassRule::Opening);
    let mut state = GameState::new(3, Side::Local);
    engine
        .apply(&mut state, Side::Local, Move::TakeThree)
        .expect("Winning take");
    assert_eq!(state.status(), GameStatus::LocalWon);

    for side in [Side::Local, Side::Remote] {
        for mv in [Move::TakeOne, Move::TakeTwo, Move::TakeThree, Move::Pass] {
            assert_eq!(engine.validate(&state, side, mv), Err(Rejection::GameOver));
        }
    }
}

#[test]
fn test_rejected_move_leaves_state_unchanged() {
    let engine = RuleEngine::default();
    let mut state = GameState::new(2, Side::Local);
    engine
        .apply(&mut state, Side::Local, Move::TakeOne)
        .expect("Legal take");
    let before = state.clone();

    assert!(engine.apply(&mut state, Side::Remote, Move::TakeThree).is_err());
    assert!(engine.apply(&mut state, Side::Local, Move::TakeOne).is_err());
    assert!(engine.apply(&mut state, Side::Remote, Move::Pass).is_err());

    assert_eq!(state, before);
}

#[test]
fn test_state_requery_is_idempotent() {
    let engine = RuleEngine::default();
    let state = engine
        .validate(&GameState::standard(Side::Local), Side::Local, Move::TakeTwo)
        .expect("Legal take");

    let first = (state.marbles(), state.turn(), state.status(), state.history().to_vec());
    let second = (state.marbles(), state.turn(), state.status(), state.history().to_vec());
    assert_eq!(first, second);
}

#[test]
fn test_heap_never_negative_and_terminal_at_zero() {
    let engine = RuleEngine::default();
    let mut state = GameState::standard(Side::Local);
    let mut side = Side::Local;

    while !state.is_over() {
        let mv = if state.marbles() >= 2 { Move::TakeTwo } else { Move::TakeOne };
        engine.apply(&mut state, side, mv).expect("Legal take");
        side = side.opponent();
    }

    assert_eq!(state.marbles(), 0);
    // 15 = 7 * 2 + 1: the eighth and last play belongs to the second mover.
    assert_eq!(state.history().len(), 8);
    assert_eq!(state.status(), GameStatus::RemoteWon);
}
