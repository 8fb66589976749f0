use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Seat index doubles as the player id within a session.
pub type PlayerId = usize;

/// Exhaustive player status. Legality checks in the betting machine are a
/// closed case analysis over this enum rather than scattered boolean flags.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerStatus {
    /// In the hand and still able to act.
    Active,
    /// Out of the current hand.
    Folded,
    /// Committed the whole stack; stays in the hand but cannot act.
    AllIn,
    /// Not dealt in (no chips, or sitting out by choice).
    SittingOut,
}

/// A player action as submitted by a human or a strategy. `Bet` carries the
/// street total to set; `Raise` carries the increment above the current
/// bet-to-call.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerAction {
    Fold,
    Check,
    Call,
    Bet(u64),
    Raise(u64),
    AllIn,
}

/// A seat at the table. The stack is mutated only by blind/ante posting,
/// bet settlement, and pot awards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub seat: PlayerId,
    pub stack: u64,
    pub status: PlayerStatus,
    /// Hole cards: empty or exactly two.
    pub hole_cards: Vec<Card>,
    /// Chips committed on the current street.
    pub street_bet: u64,
    /// Hole cards shown at showdown; cleared at the next hand start.
    pub revealed: bool,
}

impl Player {
    pub fn new(seat: PlayerId, stack: u64) -> Self {
        Self {
            seat,
            stack,
            status: PlayerStatus::SittingOut,
            hole_cards: Vec::new(),
            street_bet: 0,
            revealed: false,
        }
    }

    /// Move up to `amount` chips from the stack to the current street bet,
    /// returning what was actually paid. Paying the whole stack flips the
    /// status to `AllIn`.
    pub fn post(&mut self, amount: u64) -> u64 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.street_bet += paid;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        paid
    }

    /// Post dead money (antes): chips leave the stack without counting
    /// toward the street bet.
    pub fn post_dead(&mut self, amount: u64) -> u64 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        if self.stack == 0 && self.status == PlayerStatus::Active {
            self.status = PlayerStatus::AllIn;
        }
        paid
    }

    pub fn award(&mut self, amount: u64) {
        self.stack = self.stack.saturating_add(amount);
    }

    pub fn fold(&mut self) {
        self.status = PlayerStatus::Folded;
    }

    /// Still contesting the pot (has not folded or sat out).
    pub fn is_live(&self) -> bool {
        matches!(self.status, PlayerStatus::Active | PlayerStatus::AllIn)
    }

    /// Designated to receive a turn: live and not all-in.
    pub fn can_act(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Reset per-hand state. Players without chips sit out.
    pub fn reset_for_hand(&mut self) {
        self.hole_cards.clear();
        self.street_bet = 0;
        self.revealed = false;
        self.status = if self.stack > 0 {
            PlayerStatus::Active
        } else {
            PlayerStatus::SittingOut
        };
    }
}
