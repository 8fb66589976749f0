use std::sync::{Mutex, PoisonError};

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use holdem_engine::cards::{full_deck, Card};
use holdem_engine::hand::evaluate_hand;
use holdem_engine::player::PlayerAction;
use holdem_engine::rules::LegalAction;
use holdem_engine::strategy::{Strategy, TableView};

/// Monte Carlo strategy: estimates win probability by dealing random
/// opponent holdings and board runouts, then compares the estimate to the
/// price of the call. Seeded, so a fixed seed plays a reproducible game.
pub struct EquityStrategy {
    trials: usize,
    rng: Mutex<ChaCha20Rng>,
}

impl EquityStrategy {
    pub fn new(seed: u64) -> Self {
        Self::with_trials(seed, 200)
    }

    pub fn with_trials(seed: u64, trials: usize) -> Self {
        Self {
            trials,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    /// Share of simulated runouts this hand wins, ties counting half.
    pub fn estimate_equity(&self, hole: &[Card], board: &[Card], opponents: usize) -> f64 {
        let opponents = opponents.max(1);
        let mut unseen: Vec<Card> = full_deck()
            .into_iter()
            .filter(|c| !hole.contains(c) && !board.contains(c))
            .collect();
        let draw = 2 * opponents + (5 - board.len());
        if self.trials == 0 || unseen.len() < draw {
            return 0.0;
        }

        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut score = 0.0;
        for _ in 0..self.trials {
            let (sample, _) = unseen.partial_shuffle(&mut *rng, draw);
            let runout = &sample[2 * opponents..];
            let mut full_board = board.to_vec();
            full_board.extend_from_slice(runout);

            let mut mine = hole.to_vec();
            mine.extend_from_slice(&full_board);
            let Ok(my_strength) = evaluate_hand(&mine) else {
                continue;
            };

            let mut best_opponent = None;
            for opp in 0..opponents {
                let mut theirs = sample[2 * opp..2 * opp + 2].to_vec();
                theirs.extend_from_slice(&full_board);
                if let Ok(strength) = evaluate_hand(&theirs) {
                    if best_opponent.is_none_or(|b| strength > b) {
                        best_opponent = Some(strength);
                    }
                }
            }
            match best_opponent {
                Some(best) if best > my_strength => {}
                Some(best) if best == my_strength => score += 0.5,
                _ => score += 1.0,
            }
        }
        score / self.trials as f64
    }
}

fn pot_odds(view: &TableView) -> f64 {
    let to_call = view.bet_to_call as f64;
    if to_call == 0.0 {
        return 0.0;
    }
    to_call / (view.pot as f64 + to_call)
}

impl Strategy for EquityStrategy {
    fn decide(&self, view: &TableView) -> PlayerAction {
        if view.hole_cards.len() != 2 {
            return PlayerAction::Fold;
        }
        let equity = self.estimate_equity(&view.hole_cards, &view.board, view.live_opponents());
        let price = pot_odds(view);

        if equity >= 0.65 {
            for action in &view.legal_actions {
                match action {
                    LegalAction::Bet { min, max } => {
                        let target = (view.pot * 2 / 3).max(view.big_blind);
                        return PlayerAction::Bet(target.clamp(*min, *max));
                    }
                    LegalAction::Raise { min, .. } => return PlayerAction::Raise(*min),
                    _ => {}
                }
            }
        }
        if view.bet_to_call == 0 {
            return PlayerAction::Check;
        }
        if equity > price {
            PlayerAction::Call
        } else {
            PlayerAction::Fold
        }
    }

    fn name(&self) -> &str {
        "equity"
    }
}
