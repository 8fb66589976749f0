use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::betting::{BettingState, Street};
use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{evaluate_hand, HandStrength};
use crate::history::{
    BlindKind, EndReason, HandEvent, HandHistory, PotAward, ShowdownReveal,
};
use crate::player::{Player, PlayerAction, PlayerId, PlayerStatus};
use crate::pot::PotManager;
use crate::rules::{legal_actions, validate_action, ActionContext, AppliedAction, LegalAction};

/// Blind structure for a hand.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct Stakes {
    pub small_blind: u64,
    pub big_blind: u64,
    pub ante: u64,
}

/// Whether the hand is still waiting on a player.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandStatus {
    InProgress,
    HandComplete,
}

/// Orchestrates a single hand from blinds to settlement.
///
/// The engine owns the board, the betting round, and the pot accounting;
/// players, deck, and history belong to the session and are borrowed for
/// each call. Chips only ever move between player stacks and the pot
/// manager, which is what makes the conservation check exact.
#[derive(Debug)]
pub struct HandEngine {
    pub hand_no: u64,
    pub button: PlayerId,
    stakes: Stakes,
    burn_cards: bool,
    board: Vec<Card>,
    betting: BettingState,
    pots: PotManager,
    winners: Vec<PlayerId>,
    finished: bool,
}

/// Seats in clockwise table order starting at `start`, wrapping once.
fn seats_from(num_seats: usize, start: usize) -> impl Iterator<Item = usize> {
    (0..num_seats).map(move |i| (start + i) % num_seats)
}

impl HandEngine {
    /// Start a hand: reset seats, shuffle, post antes and blinds, deal hole
    /// cards, and open the preflop betting round.
    pub fn start(
        hand_no: u64,
        button: PlayerId,
        stakes: Stakes,
        burn_cards: bool,
        players: &mut [Player],
        deck: &mut Deck,
        history: &mut HandHistory,
    ) -> Result<Self, GameError> {
        for player in players.iter_mut() {
            player.reset_for_hand();
        }
        let num_seats = players.len();
        let dealt_in: Vec<PlayerId> = seats_from(num_seats, (button + 1) % num_seats)
            .filter(|&s| players[s].status == PlayerStatus::Active)
            .collect();
        if dealt_in.len() < 2 {
            return Err(GameError::NotEnoughPlayers);
        }

        deck.shuffle();
        history.push(HandEvent::HandStarted { hand_no, button });

        let mut pots = PotManager::new(num_seats);

        if stakes.ante > 0 {
            for &seat in &dealt_in {
                let paid = players[seat].post_dead(stakes.ante);
                pots.contribute(seat, paid);
                history.push(HandEvent::BlindPosted {
                    seat,
                    kind: BlindKind::Ante,
                    amount: paid,
                });
            }
        }

        // Heads-up, the button posts the small blind and acts first preflop.
        let (sb_seat, bb_seat) = if dealt_in.len() == 2 {
            (button, dealt_in.iter().copied().find(|&s| s != button)
                .unwrap_or(dealt_in[0]))
        } else {
            (dealt_in[0], dealt_in[1])
        };

        let paid = players[sb_seat].post(stakes.small_blind);
        pots.contribute(sb_seat, paid);
        history.push(HandEvent::BlindPosted {
            seat: sb_seat,
            kind: BlindKind::SmallBlind,
            amount: paid,
        });

        let paid = players[bb_seat].post(stakes.big_blind);
        pots.contribute(bb_seat, paid);
        history.push(HandEvent::BlindPosted {
            seat: bb_seat,
            kind: BlindKind::BigBlind,
            amount: paid,
        });

        for &seat in &dealt_in {
            let cards = deck.deal(2)?;
            players[seat].hole_cards = cards.clone();
            history.push(HandEvent::HoleCardsDealt { seat, cards });
        }

        // Preflop action opens left of the big blind; the blinds close the
        // round. A short blind post does not lower the bet to match.
        let order: Vec<PlayerId> = seats_from(num_seats, (bb_seat + 1) % num_seats)
            .filter(|&s| players[s].can_act())
            .collect();
        let betting = BettingState::new(Street::Preflop, stakes.big_blind, stakes.big_blind, order);

        let mut engine = Self {
            hand_no,
            button,
            stakes,
            burn_cards,
            board: Vec::new(),
            betting,
            pots,
            winners: Vec::new(),
            finished: false,
        };
        // All-in blinds can empty the queue outright; run the board out.
        if engine.betting.is_round_complete() {
            engine.advance(players, deck, history)?;
        }
        Ok(engine)
    }

    pub fn status(&self) -> HandStatus {
        if self.finished {
            HandStatus::HandComplete
        } else {
            HandStatus::InProgress
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn street(&self) -> Street {
        self.betting.street
    }

    pub fn board(&self) -> &[Card] {
        &self.board
    }

    pub fn current_bet(&self) -> u64 {
        self.betting.current_bet
    }

    pub fn min_raise(&self) -> u64 {
        self.betting.min_raise
    }

    pub fn pot_total(&self) -> u64 {
        self.pots.total()
    }

    pub fn pots(&self) -> &PotManager {
        &self.pots
    }

    pub fn next_actor(&self) -> Option<PlayerId> {
        if self.finished {
            None
        } else {
            self.betting.next_actor()
        }
    }

    pub fn winners(&self) -> &[PlayerId] {
        &self.winners
    }

    fn action_context(&self, player: &Player) -> ActionContext {
        ActionContext {
            stack: player.stack,
            street_bet: player.street_bet,
            current_bet: self.betting.current_bet,
            min_raise: self.betting.min_raise,
            big_blind: self.stakes.big_blind,
        }
    }

    /// Legal action menu for a seat, empty unless it is that seat's turn.
    pub fn legal_actions_for(&self, players: &[Player], seat: PlayerId) -> Vec<LegalAction> {
        match self.next_actor() {
            Some(actor) if actor == seat => legal_actions(&self.action_context(&players[seat])),
            _ => Vec::new(),
        }
    }

    /// Apply one player action. Rejections leave the hand untouched; an
    /// accepted action moves chips, advances the turn, and closes streets
    /// or the whole hand as it falls.
    pub fn apply(
        &mut self,
        seat: PlayerId,
        action: &PlayerAction,
        players: &mut [Player],
        deck: &mut Deck,
        history: &mut HandHistory,
    ) -> Result<HandStatus, GameError> {
        if self.finished {
            return Err(GameError::HandNotInProgress);
        }
        if seat >= players.len() {
            return Err(GameError::PlayerNotFound(seat));
        }
        if self.betting.next_actor() != Some(seat) {
            return Err(GameError::NotPlayersTurn(seat));
        }

        let applied = validate_action(&self.action_context(&players[seat]), action)?;
        let num_seats = players.len();
        let paid = match applied {
            AppliedAction::Fold => {
                players[seat].fold();
                self.betting.mark_acted(seat);
                0
            }
            AppliedAction::Check => {
                self.betting.mark_acted(seat);
                0
            }
            AppliedAction::Call { amount } => {
                let paid = players[seat].post(amount);
                self.pots.contribute(seat, paid);
                self.betting.mark_acted(seat);
                paid
            }
            AppliedAction::Bet { to } => {
                let paid = players[seat].post(to);
                self.pots.contribute(seat, paid);
                let respondents = self.respondents(players, seat);
                self.betting.on_aggression(seat, to, to, respondents);
                paid
            }
            AppliedAction::Raise { by, to, pay } => {
                let paid = players[seat].post(pay);
                self.pots.contribute(seat, paid);
                let respondents = self.respondents(players, seat);
                self.betting.on_aggression(seat, to, by, respondents);
                paid
            }
            AppliedAction::AllIn { amount } => {
                let paid = players[seat].post(amount);
                self.pots.contribute(seat, paid);
                let street_total = players[seat].street_bet;
                if street_total > self.betting.current_bet {
                    // Any bet-increasing all-in re-opens the action.
                    let raise_size = street_total - self.betting.current_bet;
                    let respondents = self.respondents(players, seat);
                    self.betting.on_aggression(seat, street_total, raise_size, respondents);
                } else {
                    self.betting.mark_acted(seat);
                }
                paid
            }
        };

        history.push(HandEvent::PlayerActed {
            seat,
            action: action.clone(),
            amount: paid,
            pot_after: self.pots.total(),
        });

        let live: Vec<PlayerId> = (0..num_seats).filter(|&s| players[s].is_live()).collect();
        if live.len() == 1 {
            return self.finish_by_folds(live[0], players, history);
        }
        if self.betting.is_round_complete() {
            self.advance(players, deck, history)?;
        }
        Ok(self.status())
    }

    /// Active players owing a response to aggression from `seat`, in turn
    /// order starting left of the aggressor.
    fn respondents(&self, players: &[Player], seat: PlayerId) -> Vec<PlayerId> {
        seats_from(players.len(), (seat + 1) % players.len())
            .filter(|&s| s != seat && players[s].can_act())
            .collect()
    }

    fn can_act_count(&self, players: &[Player]) -> usize {
        players.iter().filter(|p| p.can_act()).count()
    }

    /// Close the current street and deal forward. Streets with fewer than
    /// two players able to act are dealt through without betting.
    fn advance(
        &mut self,
        players: &mut [Player],
        deck: &mut Deck,
        history: &mut HandHistory,
    ) -> Result<(), GameError> {
        loop {
            let next = match self.betting.street.next() {
                Some(street) => street,
                None => return Ok(()),
            };
            for player in players.iter_mut() {
                player.street_bet = 0;
            }
            if next == Street::Showdown {
                return self.showdown(players, history);
            }

            let count = match next {
                Street::Flop => 3,
                _ => 1,
            };
            if self.burn_cards {
                deck.burn()?;
            }
            let cards = deck.deal(count)?;
            self.board.extend_from_slice(&cards);
            history.push(HandEvent::CommunityDealt {
                street: next,
                cards,
            });

            let order: Vec<PlayerId> = seats_from(players.len(), (self.button + 1) % players.len())
                .filter(|&s| players[s].can_act())
                .collect();
            self.betting = BettingState::new(next, 0, self.stakes.big_blind, order);
            if self.can_act_count(players) >= 2 {
                return Ok(());
            }
            // fewer than two players can act: keep dealing, no betting
        }
    }

    /// Everyone else folded: the last live player takes the whole pot
    /// without showing.
    fn finish_by_folds(
        &mut self,
        winner: PlayerId,
        players: &mut [Player],
        history: &mut HandHistory,
    ) -> Result<HandStatus, GameError> {
        let total = self.pots.total();
        players[winner].award(total);
        self.pots.clear();
        for player in players.iter_mut() {
            player.street_bet = 0;
        }
        self.winners = vec![winner];
        self.finished = true;
        history.push(HandEvent::HandEnded {
            winners: vec![winner],
            reason: EndReason::AllOthersFolded,
        });
        Ok(HandStatus::HandComplete)
    }

    /// Showdown: evaluate every live hand once, then settle pots smallest
    /// cap first. Each pot goes to the best live eligible hand; ties split
    /// evenly with remainder chips to the winners closest to the button's
    /// left. A pot whose eligible players all folded rolls into the next.
    fn showdown(
        &mut self,
        players: &mut [Player],
        history: &mut HandHistory,
    ) -> Result<(), GameError> {
        self.betting = BettingState::new(Street::Showdown, 0, 0, Vec::new());
        let num_seats = players.len();
        let mut strengths: HashMap<PlayerId, HandStrength> = HashMap::new();
        let mut reveals = Vec::new();
        for seat in seats_from(num_seats, (self.button + 1) % num_seats) {
            if !players[seat].is_live() {
                continue;
            }
            let mut cards = players[seat].hole_cards.clone();
            cards.extend_from_slice(&self.board);
            let strength = evaluate_hand(&cards)?;
            strengths.insert(seat, strength);
            players[seat].revealed = true;
            reveals.push(ShowdownReveal {
                seat,
                cards: players[seat].hole_cards.clone(),
                strength,
            });
        }

        let pots = self.pots.build_pots();
        let mut awards = Vec::new();
        let mut all_winners = Vec::new();
        let mut carry = 0u64;
        for pot in &pots {
            let amount = pot.amount + carry;
            carry = 0;

            let best = pot
                .eligible
                .iter()
                .filter_map(|seat| strengths.get(seat))
                .max()
                .copied();
            let winners: Vec<PlayerId> = match best {
                Some(best) => seats_from(num_seats, (self.button + 1) % num_seats)
                    .filter(|s| pot.eligible.contains(s))
                    .filter(|s| strengths.get(s) == Some(&best))
                    .collect(),
                None => {
                    carry = amount;
                    continue;
                }
            };

            let shares = crate::pot::split_award(amount, winners.len());
            for (&seat, &won) in winners.iter().zip(&shares) {
                if won == 0 {
                    continue;
                }
                players[seat].award(won);
                awards.push(PotAward { seat, amount: won });
                if !all_winners.contains(&seat) {
                    all_winners.push(seat);
                }
            }
        }
        // every pot has a live eligible player by construction
        debug_assert_eq!(carry, 0);

        self.pots.clear();
        self.winners = all_winners.clone();
        self.finished = true;
        history.push(HandEvent::Showdown { reveals, awards });
        history.push(HandEvent::HandEnded {
            winners: all_winners,
            reason: EndReason::Showdown,
        });
        Ok(())
    }
}
