use serde::{Deserialize, Serialize};

use crate::betting::Street;
use crate::cards::Card;
use crate::player::{PlayerAction, PlayerId, PlayerStatus};
use crate::rules::LegalAction;

/// One seat as visible to a viewer. Hole cards are present only for the
/// viewer's own seat or for hands revealed at showdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatView {
    pub seat: PlayerId,
    pub stack: u64,
    pub street_bet: u64,
    pub status: PlayerStatus,
    pub is_button: bool,
    pub hole_cards: Option<Vec<Card>>,
}

/// A snapshot of the table from one viewer's perspective. This is both the
/// state payload returned over the session boundary and the only input a
/// [`Strategy`] gets: strategies cannot see more than a human in the same
/// seat would.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableView {
    pub hand_no: u64,
    pub street: Street,
    pub board: Vec<Card>,
    pub pot: u64,
    pub current_bet: u64,
    /// Chips the viewer must pay to stay in. Zero when matched or when
    /// there is no viewer.
    pub bet_to_call: u64,
    pub min_raise: u64,
    pub big_blind: u64,
    pub to_act: Option<PlayerId>,
    pub viewer: Option<PlayerId>,
    /// The viewer's own hole cards.
    pub hole_cards: Vec<Card>,
    /// Legal actions for the viewer; empty unless it is the viewer's turn.
    pub legal_actions: Vec<LegalAction>,
    pub seats: Vec<SeatView>,
    pub hand_complete: bool,
}

impl TableView {
    /// Live opponents of the viewer (not folded, not sitting out).
    pub fn live_opponents(&self) -> usize {
        self.seats
            .iter()
            .filter(|s| Some(s.seat) != self.viewer)
            .filter(|s| matches!(s.status, PlayerStatus::Active | PlayerStatus::AllIn))
            .count()
    }

    pub fn can(&self, check: impl Fn(&LegalAction) -> bool) -> bool {
        self.legal_actions.iter().any(check)
    }
}

/// A decision procedure occupying a seat. Implementations must pick from
/// `view.legal_actions`; an illegal choice is retried once and then
/// replaced with a check or fold.
pub trait Strategy: Send + Sync {
    fn decide(&self, view: &TableView) -> PlayerAction;
    fn name(&self) -> &str;
}
