//! Vote casting.

use chrono::{DateTime, Utc};
use rslist_domain::{Event, User, Vote};

use crate::error::EngineError;

/// Write set of one accepted vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCast {
    /// New ledger record
    pub vote: Vote,
    /// Voter with the budget debited
    pub user: User,
    /// Event with the score credited
    pub event: Event,
}

/// Apply `quantity` votes from `user` to `event`.
///
/// Nothing is mutated in place; the caller persists the returned
/// [`VoteCast`] as one unit.
///
/// # Errors
///
/// `EngineError::InsufficientBudget` when `quantity` exceeds the user's
/// remaining budget.
pub fn cast_vote(
    user: &User,
    event: &Event,
    quantity: u32,
    voted_at: DateTime<Utc>,
) -> Result<VoteCast, EngineError> {
    if quantity > user.vote_budget {
        return Err(EngineError::InsufficientBudget {
            requested: quantity,
            remaining: user.vote_budget,
        });
    }

    let mut user = user.clone();
    user.vote_budget -= quantity;

    let mut event = event.clone();
    event.vote_num = event.vote_num.saturating_add(u64::from(quantity));

    Ok(VoteCast {
        vote: Vote::new(user.id, event.id, quantity, voted_at),
        user,
        event,
    })
}
