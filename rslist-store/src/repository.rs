//! Repository trait definitions (Ports)
//!
//! These traits define the storage interface for the domain.
//! Implementations can be PostgreSQL, in-memory, or mock for testing.

use crate::error::StoreError;
use async_trait::async_trait;
use rslist_domain::{Event, EventId, Rank, Trade, User, UserId, Vote};
use rslist_engine::{SlotPurchase, VoteCast};

/// Repository for Event entities
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Save an event (insert or update)
    async fn save(&self, event: &Event) -> Result<(), StoreError>;

    /// Find an event by ID
    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, StoreError>;

    /// All events, highest `vote_num` first, ties in insertion order
    async fn find_all_by_vote_desc(&self) -> Result<Vec<Event>, StoreError>;

    /// The event currently holding `rank`, if any
    async fn find_by_rank(&self, rank: Rank) -> Result<Option<Event>, StoreError>;

    /// Number of stored events
    async fn count(&self) -> Result<usize, StoreError>;
}

/// Repository for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Save a user (insert or update)
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

/// Repository for Vote records (append-only)
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Append a vote
    async fn save(&self, vote: &Vote) -> Result<(), StoreError>;

    /// Votes cast on an event, oldest first
    async fn find_by_event(&self, event_id: EventId) -> Result<Vec<Vote>, StoreError>;

    /// Votes cast by a user, oldest first
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Vote>, StoreError>;
}

/// Repository for Trade records (append-only)
#[async_trait]
pub trait TradeRepository: Send + Sync {
    /// Append a trade
    async fn save(&self, trade: &Trade) -> Result<(), StoreError>;

    /// Purchase history of an event, highest amount first
    async fn find_by_event_order_by_amount_desc(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Trade>, StoreError>;
}

/// Combined store interface
///
/// `commit_vote` and `commit_slot_purchase` are the two write sets the
/// services produce. Each must become visible as a whole or not at all:
/// a failed commit leaves every repository as it was.
#[async_trait]
pub trait Store: Send + Sync {
    /// Get event repository
    fn events(&self) -> &dyn EventRepository;

    /// Get user repository
    fn users(&self) -> &dyn UserRepository;

    /// Get vote repository
    fn votes(&self) -> &dyn VoteRepository;

    /// Get trade repository
    fn trades(&self) -> &dyn TradeRepository;

    /// Persist an accepted vote: ledger record, debited user, credited event.
    async fn commit_vote(&self, cast: &VoteCast) -> Result<(), StoreError>;

    /// Persist an accepted slot purchase: eviction, assignment, ledger record.
    ///
    /// The evicted event loses its rank before the buyer gains it, so a unique
    /// rank constraint never sees two holders.
    async fn commit_slot_purchase(&self, purchase: &SlotPurchase) -> Result<(), StoreError>;
}
