use thiserror::Error;

/// Error taxonomy for the engine. Every rejection is local to the offending
/// call: the turn does not advance and no state is mutated, so the caller may
/// resubmit a corrected action. `DeckExhausted` and `ConservationViolation`
/// are fatal engine defects rather than recoverable input errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("action is not legal for the current turn: {reason}")]
    InvalidAction { reason: String },

    #[error("illegal amount {amount}: minimum {minimum}, maximum {maximum}")]
    IllegalAmount {
        amount: u64,
        minimum: u64,
        maximum: u64,
    },

    #[error("deck exhausted: requested {requested} with {remaining} remaining")]
    DeckExhausted { requested: usize, remaining: usize },

    #[error("it is not player {0}'s turn to act")]
    NotPlayersTurn(usize),

    #[error("player {0} not found")]
    PlayerNotFound(usize),

    #[error("session {0} not found")]
    SessionNotFound(String),

    #[error("no hand is in progress")]
    HandNotInProgress,

    #[error("a hand is already in progress")]
    HandAlreadyInProgress,

    #[error("need at least two players with chips to start a hand")]
    NotEnoughPlayers,

    #[error("hand evaluation takes 5 to 7 cards, got {0}")]
    InvalidHandSize(usize),

    #[error("chip conservation violated: expected {expected}, found {found}")]
    ConservationViolation { expected: u64, found: u64 },

    #[error("session aborted after a fatal accounting error")]
    SessionAborted,

    #[error("invalid session config: {0}")]
    InvalidConfig(String),
}

impl GameError {
    pub fn invalid_action(reason: impl Into<String>) -> Self {
        GameError::InvalidAction {
            reason: reason.into(),
        }
    }

    /// Fatal errors abort the session instead of allowing a retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::DeckExhausted { .. } | GameError::ConservationViolation { .. }
        )
    }
}
