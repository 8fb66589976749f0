use std::sync::{Mutex, PoisonError};

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use holdem_engine::player::PlayerAction;
use holdem_engine::rules::LegalAction;
use holdem_engine::strategy::{Strategy, TableView};

/// Picks uniformly from the legal action menu. Useful as a fuzzing
/// opponent: it exercises every code path the rules allow and nothing else.
pub struct RandomStrategy {
    rng: Mutex<ChaCha20Rng>,
}

impl RandomStrategy {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }
}

impl Strategy for RandomStrategy {
    fn decide(&self, view: &TableView) -> PlayerAction {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        match view.legal_actions.choose(&mut *rng) {
            Some(LegalAction::Fold) => PlayerAction::Fold,
            Some(LegalAction::Check) => PlayerAction::Check,
            Some(LegalAction::Call { .. }) => PlayerAction::Call,
            Some(LegalAction::Bet { min, max }) => {
                PlayerAction::Bet(rng.random_range(*min..=*max))
            }
            Some(LegalAction::Raise { min, max }) => {
                PlayerAction::Raise(rng.random_range(*min..=*max))
            }
            Some(LegalAction::AllIn { .. }) => PlayerAction::AllIn,
            None => PlayerAction::Fold,
        }
    }

    fn name(&self) -> &str {
        "random"
    }
}
