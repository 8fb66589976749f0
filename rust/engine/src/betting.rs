use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::player::PlayerId;

/// Betting street. Advances monotonically within a hand; `Showdown` is
/// terminal and a hand may exit early from any pre-showdown street when all
/// but one player fold.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => Some(Street::Showdown),
            Street::Showdown => None,
        }
    }
}

/// State of one betting round.
///
/// The to-act queue encodes round completion: it holds every live,
/// non-all-in player who still owes a decision, in turn order. A bet or
/// raise re-seeds the queue with all other active players, which is exactly
/// the "full circuit since the last raise" rule. The round is complete when
/// the queue is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BettingState {
    pub street: Street,
    /// Street total each active player must match to stay in.
    pub current_bet: u64,
    /// Minimum increment for the next raise: the size of the last bet or
    /// raise on this street, or the big blind before any aggression.
    pub min_raise: u64,
    pub last_aggressor: Option<PlayerId>,
    to_act: VecDeque<PlayerId>,
}

impl BettingState {
    pub fn new(street: Street, current_bet: u64, min_raise: u64, order: Vec<PlayerId>) -> Self {
        Self {
            street,
            current_bet,
            min_raise,
            last_aggressor: None,
            to_act: order.into(),
        }
    }

    /// The single designated actor, if the round is still open.
    pub fn next_actor(&self) -> Option<PlayerId> {
        self.to_act.front().copied()
    }

    pub fn mark_acted(&mut self, seat: PlayerId) {
        self.to_act.retain(|s| *s != seat);
    }

    /// Register a bet, raise, or bet-increasing all-in: update the target
    /// bet and minimum raise, and re-seed the queue with every other active
    /// player who must now respond.
    pub fn on_aggression(
        &mut self,
        aggressor: PlayerId,
        new_bet: u64,
        raise_size: u64,
        respondents: Vec<PlayerId>,
    ) {
        self.current_bet = new_bet;
        self.min_raise = self.min_raise.max(raise_size);
        self.last_aggressor = Some(aggressor);
        self.to_act = respondents.into_iter().filter(|s| *s != aggressor).collect();
    }

    /// Drop players who can no longer act (folded or went all-in) from the
    /// queue without treating it as their turn.
    pub fn remove(&mut self, seat: PlayerId) {
        self.to_act.retain(|s| *s != seat);
    }

    pub fn is_round_complete(&self) -> bool {
        self.to_act.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streets_advance_in_order_and_stop() {
        assert_eq!(Street::Preflop.next(), Some(Street::Flop));
        assert_eq!(Street::River.next(), Some(Street::Showdown));
        assert_eq!(Street::Showdown.next(), None);
    }

    #[test]
    fn round_completes_when_queue_drains() {
        let mut state = BettingState::new(Street::Flop, 0, 100, vec![1, 2, 3]);
        assert_eq!(state.next_actor(), Some(1));
        state.mark_acted(1);
        state.mark_acted(2);
        assert!(!state.is_round_complete());
        state.mark_acted(3);
        assert!(state.is_round_complete());
    }

    #[test]
    fn aggression_reseeds_respondents_and_min_raise() {
        let mut state = BettingState::new(Street::Turn, 0, 100, vec![1, 2, 3]);
        state.mark_acted(1); // checks
        state.on_aggression(2, 300, 300, vec![3, 1, 2]);
        assert_eq!(state.current_bet, 300);
        assert_eq!(state.min_raise, 300);
        assert_eq!(state.last_aggressor, Some(2));
        // player 1 must act again after the raise
        assert_eq!(state.next_actor(), Some(3));
        state.mark_acted(3);
        assert_eq!(state.next_actor(), Some(1));
    }

    #[test]
    fn small_aggression_keeps_prior_min_raise() {
        let mut state = BettingState::new(Street::River, 200, 200, vec![1, 2]);
        // short all-in over 200 by 50 does not shrink the min raise
        state.on_aggression(1, 250, 50, vec![2]);
        assert_eq!(state.min_raise, 200);
        assert_eq!(state.current_bet, 250);
    }
}
