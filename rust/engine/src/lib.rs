//! Texas Hold'em game engine.
//!
//! The crate is layered bottom-up: cards and the deck, the hand evaluator,
//! per-seat player state, the betting round machine and action legality
//! rules, pot accounting, the single-hand orchestrator, the multi-hand
//! [`game::Game`], and finally the concurrent [`session::SessionManager`]
//! boundary. Strategies plug in through [`strategy::Strategy`] and see the
//! same [`strategy::TableView`] a human player would.
//!
//! Determinism: every game owns a seeded RNG, so a fixed seed replays the
//! same cards hand after hand. Chip conservation is checked after every
//! state change and a violation freezes the session.

pub mod betting;
pub mod cards;
pub mod deck;
pub mod engine;
pub mod errors;
pub mod game;
pub mod hand;
pub mod history;
pub mod player;
pub mod pot;
pub mod rules;
pub mod session;
pub mod strategy;

pub use betting::Street;
pub use cards::{Card, Rank, Suit};
pub use deck::Deck;
pub use engine::{HandStatus, Stakes};
pub use errors::GameError;
pub use game::{Game, GameConfig};
pub use hand::{evaluate_hand, Category, HandStrength};
pub use history::{HandEvent, HandHistory, HandRecord};
pub use player::{Player, PlayerAction, PlayerId, PlayerStatus};
pub use pot::{Pot, PotManager};
pub use rules::LegalAction;
pub use session::{SeatOccupant, Session, SessionManager};
pub use strategy::{SeatView, Strategy, TableView};
