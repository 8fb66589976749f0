use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// One pot at settlement time. `cap` is the contribution tier that closed
/// the pot (an all-in amount); the topmost pot is uncapped.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pot {
    pub amount: u64,
    pub cap: Option<u64>,
    /// Players whose total hand contribution reached this pot's tier.
    /// Folded players can appear here; settlement skips them.
    pub eligible: Vec<PlayerId>,
}

/// Tracks every chip committed to the hand, per seat, and carves the total
/// into main and side pots by contribution tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotManager {
    contributions: Vec<u64>,
}

impl PotManager {
    pub fn new(num_seats: usize) -> Self {
        Self {
            contributions: vec![0; num_seats],
        }
    }

    /// Record chips moving from a stack into the pot.
    pub fn contribute(&mut self, seat: PlayerId, amount: u64) {
        self.contributions[seat] += amount;
    }

    /// Total chips in play for this hand.
    pub fn total(&self) -> u64 {
        self.contributions.iter().sum()
    }

    /// Cumulative hand contribution of one seat.
    pub fn contribution(&self, seat: PlayerId) -> u64 {
        self.contributions[seat]
    }

    /// Empty the pot after distribution.
    pub fn clear(&mut self) {
        self.contributions.iter_mut().for_each(|c| *c = 0);
    }

    /// Split the contributions into pots, smallest cap first.
    ///
    /// Every distinct positive contribution level is a tier boundary; the
    /// slice of each contribution between two boundaries goes into the pot
    /// for the upper boundary, and a seat is eligible for a pot exactly
    /// when its total contribution reaches the pot's tier. The amounts of
    /// the returned pots always sum to [`PotManager::total`].
    pub fn build_pots(&self) -> Vec<Pot> {
        let mut levels: Vec<u64> = self
            .contributions
            .iter()
            .copied()
            .filter(|&c| c > 0)
            .collect();
        levels.sort_unstable();
        levels.dedup();

        let mut pots = Vec::new();
        let mut floor = 0u64;
        let top = *levels.last().unwrap_or(&0);

        for &level in &levels {
            let slice = level - floor;
            let eligible: Vec<PlayerId> = self
                .contributions
                .iter()
                .enumerate()
                .filter(|(_, &c)| c >= level)
                .map(|(seat, _)| seat)
                .collect();
            let amount = self
                .contributions
                .iter()
                .map(|&c| c.min(level).saturating_sub(floor))
                .sum::<u64>();
            debug_assert_eq!(amount, slice * eligible.len() as u64 + extra_below(&self.contributions, floor, level));
            pots.push(Pot {
                amount,
                cap: if level == top { None } else { Some(level) },
                eligible,
            });
            floor = level;
        }
        pots
    }
}

/// Split `amount` into `winners` shares: an even split with the odd chips,
/// one each, on the earliest shares. Winners are ordered clockwise from the
/// button's left before calling this, which fixes who gets the extras.
pub fn split_award(amount: u64, winners: usize) -> Vec<u64> {
    if winners == 0 {
        return Vec::new();
    }
    let share = amount / winners as u64;
    let remainder = amount % winners as u64;
    (0..winners as u64)
        .map(|i| if i < remainder { share + 1 } else { share })
        .collect()
}

/// Partial contributions that fall inside `(floor, level)` without reaching
/// `level` (dead money from players who committed between two tiers).
fn extra_below(contributions: &[u64], floor: u64, level: u64) -> u64 {
    contributions
        .iter()
        .filter(|&&c| c > floor && c < level)
        .map(|&c| c - floor)
        .sum()
}
