//! Engine decision errors.

use rslist_domain::Amount;
use thiserror::Error;

/// Reasons the engine refuses a requested change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Vote quantity exceeds the voter's remaining budget
    #[error("Insufficient vote budget: requested {requested}, remaining {remaining}")]
    InsufficientBudget {
        /// Votes asked for
        requested: u32,
        /// Votes the user still has
        remaining: u32,
    },

    /// Bid does not clear the event's price floor
    #[error("Insufficient bid: {bid} does not exceed floor {floor}")]
    InsufficientBid {
        /// Offered amount
        bid: Amount,
        /// Highest amount previously paid for the event
        floor: Amount,
    },
}
