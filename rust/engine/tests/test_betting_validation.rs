use holdem_engine::errors::GameError;
use holdem_engine::game::{Game, GameConfig};
use holdem_engine::player::PlayerAction;
use holdem_engine::rules::LegalAction;

fn new_game(seed: u64) -> Game {
    let mut game = Game::new(GameConfig {
        num_players: 3,
        starting_stack: 1_000,
        small_blind: 10,
        big_blind: 20,
        ante: 0,
        burn_cards: false,
        seed: Some(seed),
    })
    .unwrap();
    game.start_hand().unwrap();
    game
}

#[test]
fn acting_out_of_turn_is_rejected() {
    let mut game = new_game(1);
    assert_eq!(game.current_actor(), Some(0));
    let err = game.submit(1, &PlayerAction::Fold).unwrap_err();
    assert_eq!(err, GameError::NotPlayersTurn(1));
    // the rejection did not consume the turn
    assert_eq!(game.current_actor(), Some(0));
}

#[test]
fn betting_into_an_open_bet_is_rejected() {
    let mut game = new_game(2);
    // the big blind is a live bet, so preflop only raising is possible
    let err = game.submit(0, &PlayerAction::Bet(100)).unwrap_err();
    assert!(matches!(err, GameError::InvalidAction { .. }));
    assert_eq!(game.players()[0].stack, 1_000);
    assert_eq!(game.current_actor(), Some(0));
}

#[test]
fn under_minimum_raise_is_rejected_and_retryable() {
    let mut game = new_game(3);
    let err = game.submit(0, &PlayerAction::Raise(5)).unwrap_err();
    assert_eq!(
        err,
        GameError::IllegalAmount {
            amount: 5,
            minimum: 20,
            maximum: 980
        }
    );
    // state untouched: the same seat may resubmit a corrected action
    assert_eq!(game.players()[0].stack, 1_000);
    assert_eq!(game.current_actor(), Some(0));
    game.submit(0, &PlayerAction::Call).unwrap();
    assert_eq!(game.current_actor(), Some(1));
}

#[test]
fn big_blind_gets_the_check_option() {
    let mut game = new_game(4);
    game.submit(0, &PlayerAction::Call).unwrap();
    game.submit(1, &PlayerAction::Call).unwrap();

    let view = game.table_view(Some(2)).unwrap();
    assert_eq!(view.bet_to_call, 0);
    assert!(view.can(|a| matches!(a, LegalAction::Check)));
    game.submit(2, &PlayerAction::Check).unwrap();
}

#[test]
fn checking_while_facing_a_bet_is_rejected() {
    let mut game = new_game(5);
    let err = game.submit(0, &PlayerAction::Check).unwrap_err();
    assert!(matches!(err, GameError::InvalidAction { .. }));
}

#[test]
fn actions_after_the_hand_ends_are_rejected() {
    let mut game = new_game(6);
    game.submit(0, &PlayerAction::Fold).unwrap();
    game.submit(1, &PlayerAction::Fold).unwrap();
    let err = game.submit(2, &PlayerAction::Check).unwrap_err();
    assert_eq!(err, GameError::HandNotInProgress);
}

#[test]
fn legal_menu_matches_turn_state() {
    let game = new_game(7);
    let view = game.table_view(Some(0)).unwrap();
    // facing the big blind with no prior raise
    assert!(view.can(|a| *a == LegalAction::Call { amount: 20 }));
    assert!(view.can(|a| *a == LegalAction::Raise { min: 20, max: 980 }));
    assert!(view.can(|a| *a == LegalAction::Fold));
    assert!(view.can(|a| *a == LegalAction::AllIn { amount: 1_000 }));
    assert!(!view.can(|a| matches!(a, LegalAction::Bet { .. })));

    // not seat 1's turn, so no menu
    let other = game.table_view(Some(1)).unwrap();
    assert!(other.legal_actions.is_empty());
}

#[test]
fn starting_a_hand_twice_is_rejected() {
    let mut game = new_game(8);
    let err = game.start_hand().unwrap_err();
    assert_eq!(err, GameError::HandAlreadyInProgress);
}
