//! Service layer error types.
//!
//! Callers translate these to responses: `InvalidVote` and `InsufficientBid`
//! are client errors, `EventNotFound` and `UserNotFound` are missing
//! resources, `Store` is a server failure.

use rslist_domain::{Amount, DomainError, EventId, UserId};
use rslist_store::StoreError;
use thiserror::Error;

/// Why a vote was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidVoteReason {
    /// Voter does not exist
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// Target event does not exist
    #[error("event {0} not found")]
    EventNotFound(EventId),

    /// Quantity exceeds the remaining budget
    #[error("requested {requested} votes but only {remaining} remain")]
    InsufficientBudget {
        /// Votes asked for
        requested: u32,
        /// Votes the user still has
        remaining: u32,
    },
}

/// Errors returned by the ranking services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Vote rejected before any write
    #[error("Invalid vote: {0}")]
    InvalidVote(InvalidVoteReason),

    /// Slot purchase target does not exist
    #[error("Event not found: {0}")]
    EventNotFound(EventId),

    /// Bid did not clear the event's price floor
    #[error("Insufficient bid for event {event_id}: {bid} does not exceed {floor}")]
    InsufficientBid {
        /// Event the bid was for
        event_id: EventId,
        /// Offered amount
        bid: Amount,
        /// Highest amount previously paid for the event
        floor: Amount,
    },

    /// Referenced user does not exist
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Engine error not covered by a dedicated variant
    #[error("Engine error: {0}")]
    Engine(#[from] rslist_engine::EngineError),

    /// Store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Domain error
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
