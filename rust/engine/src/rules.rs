use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::PlayerAction;

/// Everything the legality check needs to know about the acting player and
/// the current betting round.
#[derive(Debug, Copy, Clone)]
pub struct ActionContext {
    pub stack: u64,
    /// Chips the player has already committed on this street.
    pub street_bet: u64,
    /// Street total the player must match.
    pub current_bet: u64,
    pub min_raise: u64,
    pub big_blind: u64,
}

impl ActionContext {
    pub fn to_call(&self) -> u64 {
        self.current_bet.saturating_sub(self.street_bet)
    }
}

/// A legal action offered to the acting player, with the amounts it would
/// involve. Advertised through the table view so humans and strategies pick
/// from the same menu.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum LegalAction {
    Fold,
    Check,
    Call { amount: u64 },
    Bet { min: u64, max: u64 },
    Raise { min: u64, max: u64 },
    AllIn { amount: u64 },
}

/// A validated action, resolved to the chips it moves. Produced by
/// [`validate_action`]; applying one of these cannot fail.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum AppliedAction {
    Fold,
    Check,
    /// Pay `amount` toward the current bet; an under-stack call is an
    /// all-in call for the whole stack.
    Call { amount: u64 },
    /// Open the betting at `to` on a street with no bet.
    Bet { to: u64 },
    /// Raise the bet-to-call by `by`, paying `pay` from the stack.
    Raise { by: u64, to: u64, pay: u64 },
    /// Commit the entire remaining stack.
    AllIn { amount: u64 },
}

/// Compute the legal action menu for the acting player.
///
/// Mirrors the two-row legality table: a player whose street bet matches the
/// bet-to-call may check, open a bet (only when nothing has been bet), fold,
/// or move all-in; a player short of the bet-to-call may call, raise (when
/// the stack covers a minimum raise), fold, or move all-in.
pub fn legal_actions(ctx: &ActionContext) -> Vec<LegalAction> {
    let mut actions = Vec::new();
    let to_call = ctx.to_call();

    if to_call == 0 {
        actions.push(LegalAction::Check);
        if ctx.current_bet == 0 && ctx.stack >= ctx.big_blind {
            actions.push(LegalAction::Bet {
                min: ctx.big_blind,
                max: ctx.stack,
            });
        }
    } else {
        actions.push(LegalAction::Call {
            amount: to_call.min(ctx.stack),
        });
        // a raise must be fully funded: call plus at least the minimum raise
        if ctx.stack >= to_call + ctx.min_raise {
            actions.push(LegalAction::Raise {
                min: ctx.min_raise,
                max: ctx.stack - to_call,
            });
        }
    }

    actions.push(LegalAction::Fold);
    if ctx.stack > 0 {
        actions.push(LegalAction::AllIn { amount: ctx.stack });
    }
    actions
}

/// Validate a submitted action against the current turn state.
///
/// Rejections (`InvalidAction`, `IllegalAmount`) leave all state untouched;
/// the player may resubmit. An under-minimum or over-stack bet or raise is
/// rejected rather than silently converted - the explicit `AllIn` action is
/// the way to commit a short stack.
pub fn validate_action(
    ctx: &ActionContext,
    action: &PlayerAction,
) -> Result<AppliedAction, GameError> {
    let to_call = ctx.to_call();
    match action {
        PlayerAction::Fold => Ok(AppliedAction::Fold),

        PlayerAction::Check => {
            if to_call == 0 {
                Ok(AppliedAction::Check)
            } else {
                Err(GameError::invalid_action(format!(
                    "cannot check facing a bet of {}",
                    ctx.current_bet
                )))
            }
        }

        PlayerAction::Call => {
            if to_call == 0 {
                Err(GameError::invalid_action("nothing to call"))
            } else {
                Ok(AppliedAction::Call {
                    amount: to_call.min(ctx.stack),
                })
            }
        }

        PlayerAction::Bet(amount) => {
            if ctx.current_bet != 0 {
                return Err(GameError::invalid_action(
                    "cannot bet into an open bet; raise instead",
                ));
            }
            if *amount < ctx.big_blind || *amount > ctx.stack {
                return Err(GameError::IllegalAmount {
                    amount: *amount,
                    minimum: ctx.big_blind,
                    maximum: ctx.stack,
                });
            }
            Ok(AppliedAction::Bet { to: *amount })
        }

        PlayerAction::Raise(by) => {
            if to_call == 0 {
                return Err(GameError::invalid_action(
                    "no bet to raise; bet or go all-in instead",
                ));
            }
            let max_by = ctx.stack.saturating_sub(to_call);
            if *by < ctx.min_raise || *by > max_by {
                return Err(GameError::IllegalAmount {
                    amount: *by,
                    minimum: ctx.min_raise,
                    maximum: max_by,
                });
            }
            Ok(AppliedAction::Raise {
                by: *by,
                to: ctx.current_bet + by,
                pay: to_call + by,
            })
        }

        PlayerAction::AllIn => {
            if ctx.stack == 0 {
                Err(GameError::invalid_action("no chips left to commit"))
            } else {
                Ok(AppliedAction::AllIn { amount: ctx.stack })
            }
        }
    }
}
