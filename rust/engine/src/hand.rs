use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::errors::GameError;

/// Hand category, weakest to strongest. The derived `Ord` gives the
/// standard poker ordering.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub enum Category {
    HighCard,
    OnePair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

/// Totally ordered hand strength: category first, then kickers high to low.
/// Two strengths that compare equal are an exact tie and split the pot;
/// there is no further tiebreak.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub struct HandStrength {
    pub category: Category,
    /// Tiebreak ranks, most significant first, zero-padded.
    pub kickers: [u8; 5],
}

/// Evaluate the best five-card poker hand from 5 to 7 cards.
///
/// Every five-card subset is scored by standard hand ranking and the maximum
/// is returned. Pure function of the card set: no randomness, no state.
///
/// ```
/// use holdem_engine::cards::{Card, Rank, Suit};
/// use holdem_engine::hand::{evaluate_hand, Category};
///
/// let royal = [
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::King, Suit::Spades),
///     Card::new(Rank::Queen, Suit::Spades),
///     Card::new(Rank::Jack, Suit::Spades),
///     Card::new(Rank::Ten, Suit::Spades),
/// ];
/// assert_eq!(evaluate_hand(&royal).unwrap().category, Category::RoyalFlush);
/// ```
pub fn evaluate_hand(cards: &[Card]) -> Result<HandStrength, GameError> {
    let n = cards.len();
    if !(5..=7).contains(&n) {
        return Err(GameError::InvalidHandSize(n));
    }

    let mut best: Option<HandStrength> = None;
    for a in 0..n - 4 {
        for b in a + 1..n - 3 {
            for c in b + 1..n - 2 {
                for d in c + 1..n - 1 {
                    for e in d + 1..n {
                        let strength =
                            rank_five([cards[a], cards[b], cards[c], cards[d], cards[e]]);
                        if best.map_or(true, |current| strength > current) {
                            best = Some(strength);
                        }
                    }
                }
            }
        }
    }
    best.ok_or(GameError::InvalidHandSize(n))
}

/// Rank exactly five cards.
pub fn rank_five(cards: [Card; 5]) -> HandStrength {
    let mut values: Vec<u8> = cards.iter().map(|c| c.rank.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = cards.iter().all(|c| c.suit == cards[0].suit);
    let straight_high = straight_high(&values);

    if flush {
        if let Some(high) = straight_high {
            let category = if high == Rank::Ace.value() {
                Category::RoyalFlush
            } else {
                Category::StraightFlush
            };
            return HandStrength {
                category,
                kickers: [high, 0, 0, 0, 0],
            };
        }
    }

    // Group ranks by multiplicity: (count, rank), highest count then rank first.
    let mut counts: Vec<(u8, u8)> = Vec::new();
    for &v in &values {
        match counts.iter_mut().find(|(_, rank)| *rank == v) {
            Some((count, _)) => *count += 1,
            None => counts.push((1, v)),
        }
    }
    counts.sort_unstable_by(|a, b| b.cmp(a));

    match (counts[0].0, counts.get(1).map(|g| g.0).unwrap_or(0)) {
        (4, _) => HandStrength {
            category: Category::FourOfAKind,
            kickers: [counts[0].1, counts[1].1, 0, 0, 0],
        },
        (3, 2) => HandStrength {
            category: Category::FullHouse,
            kickers: [counts[0].1, counts[1].1, 0, 0, 0],
        },
        (3, _) => HandStrength {
            category: Category::ThreeOfAKind,
            kickers: [counts[0].1, counts[1].1, counts[2].1, 0, 0],
        },
        (2, 2) => HandStrength {
            category: Category::TwoPair,
            kickers: [counts[0].1, counts[1].1, counts[2].1, 0, 0],
        },
        (2, _) => HandStrength {
            category: Category::OnePair,
            kickers: [counts[0].1, counts[1].1, counts[2].1, counts[3].1, 0],
        },
        _ => {
            if flush {
                HandStrength {
                    category: Category::Flush,
                    kickers: [values[0], values[1], values[2], values[3], values[4]],
                }
            } else if let Some(high) = straight_high {
                HandStrength {
                    category: Category::Straight,
                    kickers: [high, 0, 0, 0, 0],
                }
            } else {
                HandStrength {
                    category: Category::HighCard,
                    kickers: [values[0], values[1], values[2], values[3], values[4]],
                }
            }
        }
    }
}

/// High card of a straight formed by five descending rank values, if any.
/// The wheel (A-5-4-3-2) counts with high card 5.
fn straight_high(desc: &[u8]) -> Option<u8> {
    if desc.windows(2).any(|w| w[0] == w[1]) {
        return None;
    }
    if desc.windows(2).all(|w| w[0] == w[1] + 1) {
        return Some(desc[0]);
    }
    if desc == [14, 5, 4, 3, 2] {
        return Some(5);
    }
    None
}
