use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::deck::Deck;
use crate::engine::{HandEngine, HandStatus, Stakes};
use crate::errors::GameError;
use crate::history::{format_hand_id, HandEvent, HandHistory, HandRecord};
use crate::player::{Player, PlayerAction, PlayerId};
use crate::strategy::{SeatView, TableView};

/// Table configuration, fixed for the life of a session.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub num_players: usize,
    pub starting_stack: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    pub ante: u64,
    /// Burn a card before each community deal.
    pub burn_cards: bool,
    /// RNG seed; a fixed seed makes the whole session reproducible.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_players: 2,
            starting_stack: 1_000,
            small_blind: 10,
            big_blind: 20,
            ante: 0,
            burn_cards: false,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), GameError> {
        if !(2..=10).contains(&self.num_players) {
            return Err(GameError::InvalidConfig(format!(
                "num_players must be 2 to 10, got {}",
                self.num_players
            )));
        }
        if self.big_blind == 0 {
            return Err(GameError::InvalidConfig("big_blind must be positive".into()));
        }
        if self.small_blind > self.big_blind {
            return Err(GameError::InvalidConfig(
                "small_blind cannot exceed big_blind".into(),
            ));
        }
        if self.starting_stack < self.big_blind {
            return Err(GameError::InvalidConfig(
                "starting_stack must cover the big blind".into(),
            ));
        }
        Ok(())
    }

    fn stakes(&self) -> Stakes {
        Stakes {
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            ante: self.ante,
        }
    }
}

/// A table playing a sequence of hands with a fixed roster.
///
/// Chip conservation is checked after every state change: the sum of all
/// stacks plus the live pot must equal the chips the table started with.
/// A violation is an engine defect and freezes the game.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    seed: u64,
    players: Vec<Player>,
    deck: Deck,
    button: PlayerId,
    hand_no: u64,
    initial_chips: u64,
    hand: Option<HandEngine>,
    history: HandHistory,
    aborted: bool,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let players = (0..config.num_players)
            .map(|seat| Player::new(seat, config.starting_stack))
            .collect::<Vec<_>>();
        Ok(Self {
            config,
            seed,
            deck: Deck::new_with_seed(seed),
            button: config.num_players - 1,
            hand_no: 0,
            initial_chips: config.starting_stack * config.num_players as u64,
            players,
            hand: None,
            history: HandHistory::new(),
            aborted: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn history(&self) -> &HandHistory {
        &self.history
    }

    pub fn hand_in_progress(&self) -> bool {
        self.hand.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// The game is over when fewer than two seats still have chips.
    pub fn is_over(&self) -> bool {
        self.players.iter().filter(|p| p.stack > 0).count() < 2
    }

    /// Deal the next hand. The button moves to the next seat with chips;
    /// seats without chips sit out.
    pub fn start_hand(&mut self) -> Result<HandStatus, GameError> {
        if self.aborted {
            return Err(GameError::SessionAborted);
        }
        if self.hand_in_progress() {
            return Err(GameError::HandAlreadyInProgress);
        }
        self.button = self.next_funded_seat(self.button)?;
        self.hand_no += 1;
        let hand = HandEngine::start(
            self.hand_no,
            self.button,
            self.config.stakes(),
            self.config.burn_cards,
            &mut self.players,
            &mut self.deck,
            &mut self.history,
        )?;
        self.hand = Some(hand);
        self.check_conservation()?;
        Ok(self.hand.as_ref().map(HandEngine::status).unwrap_or(HandStatus::HandComplete))
    }

    fn next_funded_seat(&self, after: PlayerId) -> Result<PlayerId, GameError> {
        let n = self.players.len();
        (1..=n)
            .map(|i| (after + i) % n)
            .find(|&s| self.players[s].stack > 0)
            .ok_or(GameError::NotEnoughPlayers)
    }

    /// Submit an action for a seat. A recoverable rejection leaves the game
    /// unchanged; a fatal accounting error freezes the session.
    pub fn submit(&mut self, seat: PlayerId, action: &PlayerAction) -> Result<HandStatus, GameError> {
        if self.aborted {
            return Err(GameError::SessionAborted);
        }
        let hand = self.hand.as_mut().ok_or(GameError::HandNotInProgress)?;
        let status = match hand.apply(seat, action, &mut self.players, &mut self.deck, &mut self.history) {
            Ok(status) => status,
            Err(err) => {
                if err.is_fatal() {
                    self.aborted = true;
                }
                return Err(err);
            }
        };
        self.check_conservation()?;
        Ok(status)
    }

    pub fn current_actor(&self) -> Option<PlayerId> {
        self.hand.as_ref().and_then(HandEngine::next_actor)
    }

    fn check_conservation(&mut self) -> Result<(), GameError> {
        let stacks: u64 = self.players.iter().map(|p| p.stack).sum();
        let pot = self.hand.as_ref().map(HandEngine::pot_total).unwrap_or(0);
        let found = stacks + pot;
        if found != self.initial_chips {
            self.aborted = true;
            return Err(GameError::ConservationViolation {
                expected: self.initial_chips,
                found,
            });
        }
        Ok(())
    }

    /// Snapshot the table for one viewer. `None` sees only public state.
    pub fn table_view(&self, viewer: Option<PlayerId>) -> Result<TableView, GameError> {
        let hand = self.hand.as_ref().ok_or(GameError::HandNotInProgress)?;
        if let Some(seat) = viewer {
            if seat >= self.players.len() {
                return Err(GameError::PlayerNotFound(seat));
            }
        }

        let to_act = hand.next_actor();
        let seats = self
            .players
            .iter()
            .map(|p| SeatView {
                seat: p.seat,
                stack: p.stack,
                street_bet: p.street_bet,
                status: p.status,
                is_button: p.seat == hand.button,
                hole_cards: if Some(p.seat) == viewer || p.revealed {
                    Some(p.hole_cards.clone())
                } else {
                    None
                },
            })
            .collect();

        let (hole_cards, bet_to_call, legal) = match viewer {
            Some(seat) => {
                let player = &self.players[seat];
                (
                    player.hole_cards.clone(),
                    hand.current_bet().saturating_sub(player.street_bet),
                    hand.legal_actions_for(&self.players, seat),
                )
            }
            None => (Vec::new(), 0, Vec::new()),
        };

        Ok(TableView {
            hand_no: hand.hand_no,
            street: hand.street(),
            board: hand.board().to_vec(),
            pot: hand.pot_total(),
            current_bet: hand.current_bet(),
            bet_to_call,
            min_raise: hand.min_raise(),
            big_blind: self.config.big_blind,
            to_act,
            viewer,
            hole_cards,
            legal_actions: legal,
            seats,
            hand_complete: hand.is_finished(),
        })
    }

    /// Record of the most recently completed hand, for the JSONL log.
    pub fn hand_record(&self) -> Option<HandRecord> {
        let hand = self.hand.as_ref()?;
        if !hand.is_finished() {
            return None;
        }
        let events = self.history.current_hand().to_vec();
        let (winners, reason) = events.iter().rev().find_map(|e| match e {
            HandEvent::HandEnded { winners, reason } => Some((winners.clone(), *reason)),
            _ => None,
        })?;
        Some(HandRecord {
            hand_id: format_hand_id(hand.hand_no),
            timestamp: Utc::now().to_rfc3339(),
            seed: self.seed,
            button: hand.button,
            board: hand.board().to_vec(),
            winners,
            reason,
            stacks: self.players.iter().map(|p| p.stack).collect(),
            events,
        })
    }
}
