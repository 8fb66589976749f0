use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::GameError;

/// An ordered 52-card deck dealt from the front.
///
/// The deck owns its RNG, seeded once at construction, so a session shuffles
/// a deterministic sequence of permutations: the same seed always produces
/// the same run of hands.
#[derive(Debug)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
    rng: ChaCha20Rng,
}

impl Deck {
    /// A deck in fixed factory order; call [`Deck::shuffle`] before dealing.
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            cards: full_deck(),
            position: 0,
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    /// Restore all 52 cards and apply a fresh Fisher-Yates permutation.
    pub fn shuffle(&mut self) {
        self.cards = full_deck();
        self.cards.shuffle(&mut self.rng);
        self.position = 0;
    }

    /// Remove and return the top card.
    pub fn deal_one(&mut self) -> Result<Card, GameError> {
        if self.position >= self.cards.len() {
            return Err(GameError::DeckExhausted {
                requested: 1,
                remaining: 0,
            });
        }
        let card = self.cards[self.position];
        self.position += 1;
        Ok(card)
    }

    /// Remove and return the top `n` cards. Fails without dealing anything
    /// if fewer than `n` remain; with ten seats or fewer this cannot happen
    /// in a legal hand.
    pub fn deal(&mut self, n: usize) -> Result<Vec<Card>, GameError> {
        if self.remaining() < n {
            return Err(GameError::DeckExhausted {
                requested: n,
                remaining: self.remaining(),
            });
        }
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.deal_one()?);
        }
        Ok(out)
    }

    /// Discard the top card. House-rule option, off by default.
    pub fn burn(&mut self) -> Result<(), GameError> {
        self.deal_one().map(|_| ())
    }

    pub fn remaining(&self) -> usize {
        self.cards.len().saturating_sub(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_permutation() {
        let mut a = Deck::new_with_seed(42);
        let mut b = Deck::new_with_seed(42);
        a.shuffle();
        b.shuffle();
        assert_eq!(a.deal(52).unwrap(), b.deal(52).unwrap());
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = Deck::new_with_seed(1);
        let mut b = Deck::new_with_seed(2);
        a.shuffle();
        b.shuffle();
        assert_ne!(a.deal(52).unwrap(), b.deal(52).unwrap());
    }

    #[test]
    fn overdraw_is_deck_exhausted() {
        let mut deck = Deck::new_with_seed(7);
        deck.shuffle();
        deck.deal(50).unwrap();
        let err = deck.deal(3).unwrap_err();
        assert_eq!(
            err,
            GameError::DeckExhausted {
                requested: 3,
                remaining: 2
            }
        );
        // the failed deal must not have consumed anything
        assert_eq!(deck.remaining(), 2);
    }

    #[test]
    fn shuffle_restores_all_cards() {
        let mut deck = Deck::new_with_seed(9);
        deck.shuffle();
        deck.deal(20).unwrap();
        deck.shuffle();
        assert_eq!(deck.remaining(), 52);
    }
}
