//! Bot strategies for the hold'em engine.
//!
//! Every strategy implements [`holdem_engine::strategy::Strategy`] and picks
//! from the legal action menu in its table view. [`create_strategy`] builds
//! one by name for session setup.

pub mod equity;
pub mod random;
pub mod threshold;

pub use equity::EquityStrategy;
pub use random::RandomStrategy;
pub use threshold::ThresholdStrategy;

pub use holdem_engine::strategy::{Strategy, TableView};

/// Build a strategy by name. Panics on an unknown name; callers validate
/// user input before reaching this.
pub fn create_strategy(kind: &str, seed: u64) -> Box<dyn Strategy> {
    match kind {
        "threshold" => Box::new(ThresholdStrategy::new()),
        "equity" => Box::new(EquityStrategy::new(seed)),
        "random" => Box::new(RandomStrategy::new(seed)),
        _ => panic!("unknown strategy kind: {kind}"),
    }
}
