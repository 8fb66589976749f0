use holdem_engine::errors::GameError;
use holdem_engine::game::GameConfig;
use holdem_engine::history::HandEvent;
use holdem_engine::player::PlayerAction;
use holdem_engine::session::{SeatOccupant, SessionManager};
use holdem_engine::strategy::{Strategy, TableView};

/// Calls any bet, checks otherwise. Never folds, never raises.
struct CheckCall;

impl Strategy for CheckCall {
    fn decide(&self, view: &TableView) -> PlayerAction {
        if view.bet_to_call == 0 {
            PlayerAction::Check
        } else {
            PlayerAction::Call
        }
    }

    fn name(&self) -> &str {
        "check-call"
    }
}

/// Always answers with an illegal bet, to exercise the retry and fallback
/// path in the session loop.
struct Stubborn;

impl Strategy for Stubborn {
    fn decide(&self, _view: &TableView) -> PlayerAction {
        PlayerAction::Bet(1)
    }

    fn name(&self) -> &str {
        "stubborn"
    }
}

fn config(seed: u64) -> GameConfig {
    GameConfig {
        num_players: 2,
        starting_stack: 1_000,
        small_blind: 10,
        big_blind: 20,
        ante: 0,
        burn_cards: false,
        seed: Some(seed),
    }
}

fn human_vs(bot: Box<dyn Strategy>) -> Vec<SeatOccupant> {
    vec![SeatOccupant::Human, SeatOccupant::Bot(bot)]
}

#[test]
fn create_session_deals_and_waits_for_the_human() {
    let manager = SessionManager::new();
    let id = manager
        .create_session(config(1), human_vs(Box::new(CheckCall)), None)
        .unwrap();

    // heads-up: the human button posts the small blind and acts first
    let view = manager.get_state(&id, Some(0)).unwrap();
    assert_eq!(view.to_act, Some(0));
    assert_eq!(view.hole_cards.len(), 2);
    assert_eq!(view.bet_to_call, 10);
    assert!(!view.legal_actions.is_empty());
    assert_eq!(manager.session_count(), 1);
}

#[test]
fn opponent_hole_cards_stay_hidden() {
    let manager = SessionManager::new();
    let id = manager
        .create_session(config(2), human_vs(Box::new(CheckCall)), None)
        .unwrap();

    let view = manager.get_state(&id, Some(0)).unwrap();
    assert!(view.seats[0].hole_cards.is_some());
    assert!(view.seats[1].hole_cards.is_none());

    // a spectator sees no hole cards at all
    let public = manager.get_state(&id, None).unwrap();
    assert!(public.hole_cards.is_empty());
    assert!(public.seats.iter().all(|s| s.hole_cards.is_none()));
}

#[test]
fn bots_respond_after_a_human_action() {
    let manager = SessionManager::new();
    let id = manager
        .create_session(config(3), human_vs(Box::new(CheckCall)), None)
        .unwrap();

    // after the human call the bot checks its option and the flop comes
    let view = manager.submit_action(&id, 0, &PlayerAction::Call).unwrap();
    assert_eq!(view.board.len(), 3);
    // postflop the bot acts first and checks, leaving the human to act
    assert_eq!(view.to_act, Some(0));
}

#[test]
fn misbehaving_bot_falls_back_to_check_or_fold() {
    let manager = SessionManager::new();
    let id = manager
        .create_session(config(4), human_vs(Box::new(Stubborn)), None)
        .unwrap();

    // the bot's Bet(1) is illegal on every turn it gets; the session must
    // still make progress instead of looping or erroring
    let view = manager.submit_action(&id, 0, &PlayerAction::Call).unwrap();
    assert!(view.board.len() >= 3 || view.hand_complete);

    let chips: u64 = view.seats.iter().map(|s| s.stack).sum::<u64>() + view.pot;
    assert_eq!(chips, 2_000);
}

#[test]
fn submitting_for_a_bot_seat_is_rejected() {
    let manager = SessionManager::new();
    let id = manager
        .create_session(config(5), human_vs(Box::new(CheckCall)), None)
        .unwrap();
    let err = manager
        .submit_action(&id, 1, &PlayerAction::Fold)
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidAction { .. }));
}

#[test]
fn unknown_and_deleted_sessions_are_not_found() {
    let manager = SessionManager::new();
    let err = manager.get_state("no-such-session", None).unwrap_err();
    assert_eq!(err, GameError::SessionNotFound("no-such-session".into()));

    let id = manager
        .create_session(config(6), human_vs(Box::new(CheckCall)), None)
        .unwrap();
    manager.delete_session(&id).unwrap();
    assert_eq!(manager.session_count(), 0);
    let err = manager.get_state(&id, None).unwrap_err();
    assert_eq!(err, GameError::SessionNotFound(id.clone()));
    let err = manager.delete_session(&id).unwrap_err();
    assert_eq!(err, GameError::SessionNotFound(id));
}

#[test]
fn occupant_count_must_match_the_config() {
    let manager = SessionManager::new();
    let err = manager
        .create_session(config(7), vec![SeatOccupant::Human], None)
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidConfig(_)));
}

#[test]
fn history_records_the_whole_session() {
    let manager = SessionManager::new();
    let id = manager
        .create_session(config(8), human_vs(Box::new(CheckCall)), None)
        .unwrap();
    manager.submit_action(&id, 0, &PlayerAction::Fold).unwrap();

    let events = manager.get_history(&id, None).unwrap();
    assert!(matches!(events[0], HandEvent::HandStarted { hand_no: 1, .. }));
    assert!(events
        .iter()
        .any(|e| matches!(e, HandEvent::HandEnded { .. })));

    // the next hand appends to the same history
    manager.start_hand(&id).unwrap();
    let events = manager.get_history(&id, None).unwrap();
    assert!(events
        .iter()
        .any(|e| matches!(e, HandEvent::HandStarted { hand_no: 2, .. })));
}

#[test]
fn history_redacts_hole_cards_by_viewer() {
    let manager = SessionManager::new();
    let id = manager
        .create_session(config(11), human_vs(Box::new(CheckCall)), None)
        .unwrap();

    // hand one ends on a fold: nobody showed, so nobody's cards appear
    manager.submit_action(&id, 0, &PlayerAction::Fold).unwrap();
    let spectator = manager.get_history(&id, None).unwrap();
    assert!(!spectator
        .iter()
        .any(|e| matches!(e, HandEvent::HoleCardsDealt { .. })));

    // the human sees its own deal and nothing else
    let own = manager.get_history(&id, Some(0)).unwrap();
    let dealt: Vec<_> = own
        .iter()
        .filter_map(|e| match e {
            HandEvent::HoleCardsDealt { seat, .. } => Some(*seat),
            _ => None,
        })
        .collect();
    assert_eq!(dealt, vec![0]);

    // a hand that reaches showdown exposes the shown hands to everyone
    manager.start_hand(&id).unwrap();
    while !manager.get_state(&id, None).unwrap().hand_complete {
        let view = manager.get_state(&id, Some(0)).unwrap();
        let action = if view.bet_to_call == 0 {
            PlayerAction::Check
        } else {
            PlayerAction::Call
        };
        manager.submit_action(&id, 0, &action).unwrap();
    }
    let spectator = manager.get_history(&id, None).unwrap();
    let shown: Vec<_> = spectator
        .iter()
        .filter_map(|e| match e {
            HandEvent::HoleCardsDealt { seat, .. } => Some(*seat),
            _ => None,
        })
        .collect();
    assert_eq!(shown.len(), 2, "both showdown hands should be visible");
}

#[test]
fn bot_only_session_plays_hands_to_completion() {
    let manager = SessionManager::new();
    let seats = vec![
        SeatOccupant::Bot(Box::new(CheckCall)),
        SeatOccupant::Bot(Box::new(CheckCall)),
    ];
    let id = manager.create_session(config(9), seats, None).unwrap();

    // with no humans every hand finishes inside the call that starts it
    let view = manager.get_state(&id, None).unwrap();
    assert!(view.hand_complete);

    for _ in 0..20 {
        match manager.start_hand(&id) {
            Ok(view) => {
                assert!(view.hand_complete);
                let chips: u64 =
                    view.seats.iter().map(|s| s.stack).sum::<u64>() + view.pot;
                assert_eq!(chips, 2_000);
            }
            Err(GameError::NotEnoughPlayers) => break,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
}

#[test]
fn hand_log_gets_one_line_per_hand() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.jsonl");
    let manager = SessionManager::new();
    let seats = vec![
        SeatOccupant::Bot(Box::new(CheckCall)),
        SeatOccupant::Bot(Box::new(CheckCall)),
    ];
    let id = manager
        .create_session(config(10), seats, Some(path.clone()))
        .unwrap();
    manager.start_hand(&id).unwrap();
    manager.start_hand(&id).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().count(), 3);
    for line in contents.lines() {
        let record: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(record.get("hand_id").is_some());
        assert!(record.get("winners").is_some());
    }
}
