use holdem_engine::cards::{Card, Rank};
use holdem_engine::hand::{evaluate_hand, Category};
use holdem_engine::player::PlayerAction;
use holdem_engine::rules::LegalAction;
use holdem_engine::strategy::{Strategy, TableView};

/// Rule-based strategy: a preflop strength chart plus made-hand category
/// and pot odds after the flop. Deterministic for a given view.
#[derive(Debug, Default)]
pub struct ThresholdStrategy;

impl ThresholdStrategy {
    pub fn new() -> Self {
        Self
    }
}

/// Preflop hole card strength on a 0-10 scale.
pub fn preflop_score(cards: &[Card]) -> u8 {
    let (a, b) = match cards {
        [a, b] => (*a, *b),
        _ => return 0,
    };
    let (high, low) = if a.rank >= b.rank { (a, b) } else { (b, a) };
    let suited = a.suit == b.suit;
    let gap = high.rank.value() - low.rank.value();

    if a.rank == b.rank {
        return match high.rank {
            Rank::Ace | Rank::King | Rank::Queen => 10,
            Rank::Jack | Rank::Ten => 9,
            r if r.value() >= 6 => 8,
            _ => 7,
        };
    }
    if high.rank >= Rank::Queen && low.rank >= Rank::Queen {
        return if suited { 9 } else { 8 };
    }
    if high.rank == Rank::Ace {
        return if suited {
            7
        } else if low.rank >= Rank::Ten {
            7
        } else {
            5
        };
    }
    if high.rank >= Rank::Ten && low.rank >= Rank::Ten {
        return if suited { 8 } else { 7 };
    }
    // connected cards that can make straights both ways
    if gap <= 1 && low.rank.value() >= 8 {
        return if suited { 6 } else { 5 };
    }
    if suited && gap <= 2 && low.rank.value() >= 6 {
        return 5;
    }
    if high.rank >= Rank::Jack {
        return 4;
    }
    if high.rank.value() >= 8 {
        return 3;
    }
    2
}

/// Price of a call as a fraction of the pot after calling.
fn pot_odds(view: &TableView) -> f64 {
    let to_call = view.bet_to_call as f64;
    if to_call == 0.0 {
        return 0.0;
    }
    to_call / (view.pot as f64 + to_call)
}

fn find_bet(view: &TableView) -> Option<(u64, u64)> {
    view.legal_actions.iter().find_map(|a| match a {
        LegalAction::Bet { min, max } => Some((*min, *max)),
        _ => None,
    })
}

fn find_raise(view: &TableView) -> Option<(u64, u64)> {
    view.legal_actions.iter().find_map(|a| match a {
        LegalAction::Raise { min, max } => Some((*min, *max)),
        _ => None,
    })
}

fn can_check(view: &TableView) -> bool {
    view.can(|a| matches!(a, LegalAction::Check))
}

fn can_call(view: &TableView) -> bool {
    view.can(|a| matches!(a, LegalAction::Call { .. }))
}

/// Bet about half the pot, clamped to the legal window.
fn sized_bet(view: &TableView, min: u64, max: u64) -> PlayerAction {
    let target = (view.pot / 2).max(view.big_blind);
    PlayerAction::Bet(target.clamp(min, max))
}

fn aggress(view: &TableView) -> Option<PlayerAction> {
    if let Some((min, max)) = find_bet(view) {
        return Some(sized_bet(view, min, max));
    }
    if let Some((min, _)) = find_raise(view) {
        return Some(PlayerAction::Raise(min));
    }
    None
}

fn passive(view: &TableView) -> PlayerAction {
    if can_check(view) {
        PlayerAction::Check
    } else if can_call(view) {
        PlayerAction::Call
    } else {
        PlayerAction::Fold
    }
}

fn check_or_fold(view: &TableView) -> PlayerAction {
    if can_check(view) {
        PlayerAction::Check
    } else {
        PlayerAction::Fold
    }
}

impl Strategy for ThresholdStrategy {
    fn decide(&self, view: &TableView) -> PlayerAction {
        if view.board.is_empty() {
            let score = preflop_score(&view.hole_cards);
            return match score {
                8..=10 => aggress(view).unwrap_or_else(|| passive(view)),
                5..=7 => passive(view),
                _ => check_or_fold(view),
            };
        }

        let mut cards = view.hole_cards.clone();
        cards.extend_from_slice(&view.board);
        let category = match evaluate_hand(&cards) {
            Ok(strength) => strength.category,
            Err(_) => return check_or_fold(view),
        };

        if category >= Category::TwoPair {
            return aggress(view).unwrap_or_else(|| passive(view));
        }
        if category == Category::OnePair {
            // a pair is worth a cheap call, not a big one
            return if pot_odds(view) <= 0.25 {
                passive(view)
            } else {
                check_or_fold(view)
            };
        }
        check_or_fold(view)
    }

    fn name(&self) -> &str {
        "threshold"
    }
}
