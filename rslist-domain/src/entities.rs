//! Domain Entities for rslist
//!
//! Events are the ranked items; users hold a vote budget.
//! Votes and trades are immutable ledger records.

use crate::value_objects::{validate_text, Amount, DomainError, Rank};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Identifiers
// =============================================================================

/// Unique identifier for an Event
pub type EventId = Uuid;

/// Unique identifier for a User
pub type UserId = Uuid;

/// Unique identifier for a Vote
pub type VoteId = Uuid;

/// Unique identifier for a Trade
pub type TradeId = Uuid;

// =============================================================================
// Event
// =============================================================================

/// A submitted item on the list.
///
/// `vote_num` only grows (through voting). `rank` is the current-state
/// pointer to a purchased slot; the trade ledger holds the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    /// User who submitted the event
    pub user_id: UserId,
    pub name: String,
    pub keyword: String,
    pub vote_num: u64,
    /// Purchased slot, `None` when unranked
    pub rank: Option<Rank>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Create a new unranked event with no votes
    ///
    /// # Errors
    /// Returns `DomainError::InvalidName` if name or keyword is blank
    pub fn new(user_id: UserId, name: &str, keyword: &str) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::now_v7(),
            user_id,
            name: validate_text("event name", name)?,
            keyword: validate_text("keyword", keyword)?,
            vote_num: 0,
            rank: None,
            created_at: Utc::now(),
        })
    }

    /// Whether the event currently holds a purchased slot
    pub fn is_ranked(&self) -> bool {
        self.rank.is_some()
    }

    /// Copy of this event pinned to `rank`
    pub fn with_rank(&self, rank: Option<Rank>) -> Self {
        Self { rank, ..self.clone() }
    }
}

// =============================================================================
// User
// =============================================================================

/// A voter with a finite, decrementing vote budget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub user_name: String,
    pub email: Option<String>,
    /// Remaining votes this user may cast
    pub vote_budget: u32,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given vote budget
    ///
    /// # Errors
    /// Returns `DomainError::InvalidName` if the user name is blank
    pub fn new(
        user_name: &str,
        email: Option<String>,
        vote_budget: u32,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id: Uuid::now_v7(),
            user_name: validate_text("user name", user_name)?,
            email,
            vote_budget,
            created_at: Utc::now(),
        })
    }
}

// =============================================================================
// Vote
// =============================================================================

/// Immutable record of one accepted vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: VoteId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub quantity: u32,
    pub voted_at: DateTime<Utc>,
}

impl Vote {
    /// Create a vote record
    pub fn new(user_id: UserId, event_id: EventId, quantity: u32, voted_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            event_id,
            quantity,
            voted_at,
        }
    }
}

// =============================================================================
// Trade
// =============================================================================

/// Immutable record of one accepted slot purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: TradeId,
    pub event_id: EventId,
    pub amount: Amount,
    pub rank: Rank,
    pub traded_at: DateTime<Utc>,
}

impl Trade {
    /// Create a trade record
    pub fn new(event_id: EventId, amount: Amount, rank: Rank, traded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_id,
            amount,
            rank,
            traded_at,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_event_is_unranked_with_no_votes() {
        let event = Event::new(Uuid::now_v7(), "Rust 2.0 released", "tech").unwrap();

        assert_eq!(event.vote_num, 0);
        assert!(event.rank.is_none());
        assert!(!event.is_ranked());
    }

    #[test]
    fn test_event_rejects_blank_keyword() {
        let result = Event::new(Uuid::now_v7(), "name", " ");
        assert!(matches!(result, Err(DomainError::InvalidName(_))));
    }

    #[test]
    fn test_event_with_rank_keeps_identity() {
        let event = Event::new(Uuid::now_v7(), "name", "kw").unwrap();
        let ranked = event.with_rank(Some(Rank::new(2).unwrap()));

        assert_eq!(ranked.id, event.id);
        assert_eq!(ranked.rank.map(|r| r.get()), Some(2));
    }

    #[test]
    fn test_user_rejects_blank_name() {
        assert!(User::new("", None, 10).is_err());
        assert_eq!(User::new("xiaoli", None, 10).unwrap().vote_budget, 10);
    }

    #[test]
    fn test_trade_serialization() {
        let trade = Trade::new(
            Uuid::now_v7(),
            Amount::new(dec!(100)).unwrap(),
            Rank::new(1).unwrap(),
            Utc::now(),
        );

        let json = serde_json::to_string(&trade).unwrap();
        let parsed: Trade = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, trade);
    }
}
