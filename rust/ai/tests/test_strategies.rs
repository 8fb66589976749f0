use holdem_ai::{create_strategy, EquityStrategy, RandomStrategy, Strategy, ThresholdStrategy};
use holdem_engine::game::{Game, GameConfig};
use holdem_engine::session::{SeatOccupant, SessionManager};

fn config(num_players: usize, seed: u64) -> GameConfig {
    GameConfig {
        num_players,
        starting_stack: 400,
        small_blind: 5,
        big_blind: 10,
        ante: 0,
        burn_cards: false,
        seed: Some(seed),
    }
}

/// Drive a game with one strategy per seat; every decision must be legal
/// as submitted, with no retries.
fn play_out(mut game: Game, strategies: Vec<Box<dyn Strategy>>, max_hands: usize) {
    let total: u64 = game.players().iter().map(|p| p.stack).sum();
    for _ in 0..max_hands {
        if game.is_over() {
            break;
        }
        game.start_hand().unwrap();
        let mut guard = 0;
        while let Some(seat) = game.current_actor() {
            let view = game.table_view(Some(seat)).unwrap();
            let action = strategies[seat].decide(&view);
            game.submit(seat, &action)
                .unwrap_or_else(|err| panic!("{} chose illegal {action:?}: {err}", strategies[seat].name()));
            guard += 1;
            assert!(guard < 500, "hand did not terminate");
        }
        let stacks: u64 = game.players().iter().map(|p| p.stack).sum();
        assert_eq!(stacks, total);
    }
}

#[test]
fn threshold_strategy_only_picks_legal_actions() {
    let game = Game::new(config(3, 17)).unwrap();
    let strategies: Vec<Box<dyn Strategy>> = (0..3)
        .map(|_| Box::new(ThresholdStrategy::new()) as Box<dyn Strategy>)
        .collect();
    play_out(game, strategies, 60);
}

#[test]
fn random_strategy_only_picks_legal_actions() {
    let game = Game::new(config(4, 23)).unwrap();
    let strategies: Vec<Box<dyn Strategy>> = (0..4)
        .map(|seat| Box::new(RandomStrategy::new(seat as u64)) as Box<dyn Strategy>)
        .collect();
    play_out(game, strategies, 60);
}

#[test]
fn equity_strategy_only_picks_legal_actions() {
    let game = Game::new(config(2, 31)).unwrap();
    let strategies: Vec<Box<dyn Strategy>> = (0..2)
        .map(|seat| Box::new(EquityStrategy::with_trials(seat as u64, 40)) as Box<dyn Strategy>)
        .collect();
    play_out(game, strategies, 40);
}

#[test]
fn mixed_bot_session_conserves_chips_to_the_end() {
    let manager = SessionManager::new();
    let seats = vec![
        SeatOccupant::Bot(create_strategy("threshold", 1)),
        SeatOccupant::Bot(Box::new(EquityStrategy::with_trials(2, 40))),
        SeatOccupant::Bot(create_strategy("random", 3)),
    ];
    let id = manager.create_session(config(3, 41), seats, None).unwrap();

    for _ in 0..150 {
        match manager.start_hand(&id) {
            Ok(view) => {
                assert!(view.hand_complete);
                let chips: u64 =
                    view.seats.iter().map(|s| s.stack).sum::<u64>() + view.pot;
                assert_eq!(chips, 1_200);
            }
            Err(holdem_engine::errors::GameError::NotEnoughPlayers) => return,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }
}
