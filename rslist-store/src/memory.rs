//! In-memory store implementation
//!
//! Used for testing and development without a database.
//! Thread-safe using RwLock for concurrent access.

use crate::error::StoreError;
use crate::repository::{EventRepository, Store, TradeRepository, UserRepository, VoteRepository};
use async_trait::async_trait;
use rslist_domain::{Event, EventId, Rank, Trade, User, UserId, Vote};
use rslist_engine::{SlotPurchase, VoteCast};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory store for testing
pub struct MemoryStore {
    events: RwLock<HashMap<EventId, StoredEvent>>,
    users: RwLock<HashMap<UserId, User>>,
    votes: RwLock<Vec<Vote>>,
    trades: RwLock<Vec<Trade>>,
    event_seq: AtomicI64,
}

/// Event with insertion sequence number (vote-order tie-break)
struct StoredEvent {
    seq: i64,
    event: Event,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryStore {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            votes: RwLock::new(Vec::new()),
            trades: RwLock::new(Vec::new()),
            event_seq: AtomicI64::new(0),
        }
    }

    /// Get the number of events
    pub fn event_count(&self) -> usize {
        read(&self.events).len()
    }

    /// Get the number of votes
    pub fn vote_count(&self) -> usize {
        read(&self.votes).len()
    }

    /// Get the number of trades
    pub fn trade_count(&self) -> usize {
        read(&self.trades).len()
    }

    /// Insert or update an event in an already-locked map.
    ///
    /// Rejects a rank already held by a different event.
    fn upsert_event(
        &self,
        events: &mut HashMap<EventId, StoredEvent>,
        event: &Event,
    ) -> Result<(), StoreError> {
        if let Some(rank) = event.rank {
            let taken = events
                .values()
                .any(|s| s.event.id != event.id && s.event.rank == Some(rank));
            if taken {
                return Err(StoreError::duplicate("event rank", rank.to_string()));
            }
        }

        match events.get_mut(&event.id) {
            Some(stored) => stored.event = event.clone(),
            None => {
                let seq = self.event_seq.fetch_add(1, Ordering::SeqCst) + 1;
                events.insert(event.id, StoredEvent { seq, event: event.clone() });
            },
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Event Repository Implementation
// =============================================================================

#[async_trait]
impl EventRepository for MemoryStore {
    async fn save(&self, event: &Event) -> Result<(), StoreError> {
        let mut events = write(&self.events);
        self.upsert_event(&mut events, event)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        Ok(read(&self.events).get(&id).map(|s| s.event.clone()))
    }

    async fn find_all_by_vote_desc(&self) -> Result<Vec<Event>, StoreError> {
        let events = read(&self.events);
        let mut stored: Vec<&StoredEvent> = events.values().collect();
        stored.sort_by(|a, b| b.event.vote_num.cmp(&a.event.vote_num).then(a.seq.cmp(&b.seq)));
        Ok(stored.into_iter().map(|s| s.event.clone()).collect())
    }

    async fn find_by_rank(&self, rank: Rank) -> Result<Option<Event>, StoreError> {
        Ok(read(&self.events)
            .values()
            .find(|s| s.event.rank == Some(rank))
            .map(|s| s.event.clone()))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.event_count())
    }
}

// =============================================================================
// User Repository Implementation
// =============================================================================

#[async_trait]
impl UserRepository for MemoryStore {
    async fn save(&self, user: &User) -> Result<(), StoreError> {
        write(&self.users).insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(read(&self.users).get(&id).cloned())
    }
}

// =============================================================================
// Vote Repository Implementation
// =============================================================================

#[async_trait]
impl VoteRepository for MemoryStore {
    async fn save(&self, vote: &Vote) -> Result<(), StoreError> {
        let mut votes = write(&self.votes);
        if votes.iter().any(|v| v.id == vote.id) {
            return Err(StoreError::duplicate("vote", vote.id.to_string()));
        }
        votes.push(vote.clone());
        Ok(())
    }

    async fn find_by_event(&self, event_id: EventId) -> Result<Vec<Vote>, StoreError> {
        Ok(read(&self.votes).iter().filter(|v| v.event_id == event_id).cloned().collect())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Vote>, StoreError> {
        Ok(read(&self.votes).iter().filter(|v| v.user_id == user_id).cloned().collect())
    }
}

// =============================================================================
// Trade Repository Implementation
// =============================================================================

#[async_trait]
impl TradeRepository for MemoryStore {
    async fn save(&self, trade: &Trade) -> Result<(), StoreError> {
        let mut trades = write(&self.trades);
        if trades.iter().any(|t| t.id == trade.id) {
            return Err(StoreError::duplicate("trade", trade.id.to_string()));
        }
        trades.push(trade.clone());
        Ok(())
    }

    async fn find_by_event_order_by_amount_desc(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Trade>, StoreError> {
        let mut found: Vec<Trade> =
            read(&self.trades).iter().filter(|t| t.event_id == event_id).cloned().collect();
        // stable: equal amounts stay in purchase order
        found.sort_by(|a, b| b.amount.cmp(&a.amount));
        Ok(found)
    }
}

// =============================================================================
// Store Implementation
// =============================================================================

#[async_trait]
impl Store for MemoryStore {
    fn events(&self) -> &dyn EventRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn votes(&self) -> &dyn VoteRepository {
        self
    }

    fn trades(&self) -> &dyn TradeRepository {
        self
    }

    /// All three writes under one set of locks.
    async fn commit_vote(&self, cast: &VoteCast) -> Result<(), StoreError> {
        let mut users = write(&self.users);
        let mut events = write(&self.events);
        let mut votes = write(&self.votes);

        if votes.iter().any(|v| v.id == cast.vote.id) {
            return Err(StoreError::duplicate("vote", cast.vote.id.to_string()));
        }

        self.upsert_event(&mut events, &cast.event)?;
        users.insert(cast.user.id, cast.user.clone());
        votes.push(cast.vote.clone());
        Ok(())
    }

    /// Validates the whole write set before applying any of it.
    async fn commit_slot_purchase(&self, purchase: &SlotPurchase) -> Result<(), StoreError> {
        let mut events = write(&self.events);
        let mut trades = write(&self.trades);

        if !events.contains_key(&purchase.event_id()) {
            return Err(StoreError::not_found("event", purchase.event_id().to_string()));
        }
        if let Some(evicted_id) = purchase.evicted {
            if !events.contains_key(&evicted_id) {
                return Err(StoreError::not_found("event", evicted_id.to_string()));
            }
        }
        let foreign_holder = events.values().any(|s| {
            s.event.id != purchase.event_id()
                && Some(s.event.id) != purchase.evicted
                && s.event.rank == Some(purchase.rank())
        });
        if foreign_holder {
            return Err(StoreError::duplicate("event rank", purchase.rank().to_string()));
        }
        if trades.iter().any(|t| t.id == purchase.trade.id) {
            return Err(StoreError::duplicate("trade", purchase.trade.id.to_string()));
        }

        if let Some(evicted_id) = purchase.evicted {
            if let Some(stored) = events.get_mut(&evicted_id) {
                stored.event.rank = None;
            }
        }
        if let Some(stored) = events.get_mut(&purchase.event_id()) {
            stored.event.rank = Some(purchase.rank());
        }
        trades.push(purchase.trade.clone());
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rslist_domain::Amount;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn create_test_event(votes: u64) -> Event {
        let mut event = Event::new(Uuid::now_v7(), "event name", "keyword").unwrap();
        event.vote_num = votes;
        event
    }

    fn rank(value: u32) -> Rank {
        Rank::new(value).unwrap()
    }

    fn create_test_trade(event_id: EventId, amount: rust_decimal::Decimal, slot: u32) -> Trade {
        Trade::new(event_id, Amount::new(amount).unwrap(), rank(slot), Utc::now())
    }

    // Event Repository Tests
    #[tokio::test]
    async fn test_event_save_and_find() {
        let store = MemoryStore::new();
        let event = create_test_event(0);
        let id = event.id;

        EventRepository::save(&store, &event).await.unwrap();

        let found = EventRepository::find_by_id(&store, id).await.unwrap();
        assert_eq!(found, Some(event));
    }

    #[tokio::test]
    async fn test_event_update_keeps_single_row() {
        let store = MemoryStore::new();
        let mut event = create_test_event(0);

        EventRepository::save(&store, &event).await.unwrap();
        event.vote_num = 7;
        EventRepository::save(&store, &event).await.unwrap();

        assert_eq!(store.event_count(), 1);
        let found = EventRepository::find_by_id(&store, event.id).await.unwrap().unwrap();
        assert_eq!(found.vote_num, 7);
    }

    #[tokio::test]
    async fn test_events_ordered_by_votes_then_insertion() {
        let store = MemoryStore::new();
        let first = create_test_event(5);
        let second = create_test_event(9);
        let third = create_test_event(5);

        for event in [&first, &second, &third] {
            EventRepository::save(&store, event).await.unwrap();
        }

        let ids: Vec<EventId> = store
            .find_all_by_vote_desc()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id, third.id]);
    }

    #[tokio::test]
    async fn test_tie_break_survives_updates() {
        let store = MemoryStore::new();
        let mut first = create_test_event(1);
        let second = create_test_event(1);

        EventRepository::save(&store, &first).await.unwrap();
        EventRepository::save(&store, &second).await.unwrap();
        first.keyword = "edited".to_string();
        EventRepository::save(&store, &first).await.unwrap();

        let ordered = store.find_all_by_vote_desc().await.unwrap();
        assert_eq!(ordered[0].id, first.id);
    }

    #[tokio::test]
    async fn test_event_find_by_rank() {
        let store = MemoryStore::new();
        let ranked = create_test_event(0).with_rank(Some(rank(2)));
        let unranked = create_test_event(0);

        EventRepository::save(&store, &ranked).await.unwrap();
        EventRepository::save(&store, &unranked).await.unwrap();

        let found = store.find_by_rank(rank(2)).await.unwrap();
        assert_eq!(found.map(|e| e.id), Some(ranked.id));
        assert!(store.find_by_rank(rank(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_event_save_rejects_taken_rank() {
        let store = MemoryStore::new();
        let holder = create_test_event(0).with_rank(Some(rank(1)));
        let intruder = create_test_event(0).with_rank(Some(rank(1)));

        EventRepository::save(&store, &holder).await.unwrap();
        let result = EventRepository::save(&store, &intruder).await;

        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
    }

    // User Repository Tests
    #[tokio::test]
    async fn test_user_save_and_find() {
        let store = MemoryStore::new();
        let user = User::new("xiaoli", Some("a@b.com".to_string()), 10).unwrap();

        UserRepository::save(&store, &user).await.unwrap();

        let found = UserRepository::find_by_id(&store, user.id).await.unwrap();
        assert_eq!(found, Some(user));
    }

    // Vote Repository Tests
    #[tokio::test]
    async fn test_vote_find_by_event_and_user() {
        let store = MemoryStore::new();
        let user_id = Uuid::now_v7();
        let event_id = Uuid::now_v7();

        VoteRepository::save(&store, &Vote::new(user_id, event_id, 1, Utc::now())).await.unwrap();
        VoteRepository::save(&store, &Vote::new(user_id, Uuid::now_v7(), 2, Utc::now()))
            .await
            .unwrap();

        assert_eq!(store.find_by_event(event_id).await.unwrap().len(), 1);
        assert_eq!(store.find_by_user(user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_vote_duplicate_rejected() {
        let store = MemoryStore::new();
        let vote = Vote::new(Uuid::now_v7(), Uuid::now_v7(), 1, Utc::now());

        VoteRepository::save(&store, &vote).await.unwrap();
        let result = VoteRepository::save(&store, &vote).await;

        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
    }

    // Trade Repository Tests
    #[tokio::test]
    async fn test_trades_ordered_by_amount_desc() {
        let store = MemoryStore::new();
        let event_id = Uuid::now_v7();

        TradeRepository::save(&store, &create_test_trade(event_id, dec!(50), 2)).await.unwrap();
        TradeRepository::save(&store, &create_test_trade(event_id, dec!(200), 1)).await.unwrap();
        TradeRepository::save(&store, &create_test_trade(Uuid::now_v7(), dec!(999), 1))
            .await
            .unwrap();

        let found = store.find_by_event_order_by_amount_desc(event_id).await.unwrap();
        let amounts: Vec<_> = found.iter().map(|t| t.amount.as_decimal()).collect();
        assert_eq!(amounts, vec![dec!(200), dec!(50)]);
    }

    // Store Tests
    #[tokio::test]
    async fn test_commit_slot_purchase_evicts_and_assigns() {
        let store = MemoryStore::new();
        let holder = create_test_event(0).with_rank(Some(rank(1)));
        let buyer = create_test_event(0);
        EventRepository::save(&store, &holder).await.unwrap();
        EventRepository::save(&store, &buyer).await.unwrap();

        let purchase = SlotPurchase {
            evicted: Some(holder.id),
            trade: Trade::new(buyer.id, Amount::ZERO, rank(1), Utc::now()),
        };
        store.commit_slot_purchase(&purchase).await.unwrap();

        let holder = EventRepository::find_by_id(&store, holder.id).await.unwrap().unwrap();
        let buyer = EventRepository::find_by_id(&store, buyer.id).await.unwrap().unwrap();
        assert!(holder.rank.is_none());
        assert_eq!(buyer.rank, Some(rank(1)));
        assert_eq!(store.trade_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_slot_purchase_missing_event_writes_nothing() {
        let store = MemoryStore::new();
        let holder = create_test_event(0).with_rank(Some(rank(1)));
        EventRepository::save(&store, &holder).await.unwrap();

        let ghost = Uuid::now_v7();
        let purchase = SlotPurchase {
            evicted: Some(holder.id),
            trade: Trade::new(ghost, Amount::ZERO, rank(1), Utc::now()),
        };
        let result = store.commit_slot_purchase(&purchase).await;

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
        let holder = EventRepository::find_by_id(&store, holder.id).await.unwrap().unwrap();
        assert_eq!(holder.rank, Some(rank(1)));
        assert_eq!(store.trade_count(), 0);
    }

    #[tokio::test]
    async fn test_commit_slot_purchase_failed_trade_keeps_ranks() {
        let store = MemoryStore::new();
        let holder = create_test_event(0).with_rank(Some(rank(1)));
        let buyer = create_test_event(0);
        EventRepository::save(&store, &holder).await.unwrap();
        EventRepository::save(&store, &buyer).await.unwrap();

        let trade = Trade::new(buyer.id, Amount::ZERO, rank(1), Utc::now());
        TradeRepository::save(&store, &trade).await.unwrap();

        // Ledger append is the last write and it fails; nothing before it may stick.
        let purchase = SlotPurchase { evicted: Some(holder.id), trade };
        let result = store.commit_slot_purchase(&purchase).await;

        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
        let holder = EventRepository::find_by_id(&store, holder.id).await.unwrap().unwrap();
        let buyer = EventRepository::find_by_id(&store, buyer.id).await.unwrap().unwrap();
        assert_eq!(holder.rank, Some(rank(1)));
        assert!(buyer.rank.is_none());
        assert_eq!(store.trade_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_vote_duplicate_leaves_budget_and_score() {
        let store = MemoryStore::new();
        let user = User::new("voter", None, 5).unwrap();
        let event = create_test_event(0);
        UserRepository::save(&store, &user).await.unwrap();
        EventRepository::save(&store, &event).await.unwrap();

        let cast = rslist_engine::cast_vote(&user, &event, 2, Utc::now()).unwrap();
        VoteRepository::save(&store, &cast.vote).await.unwrap();
        let result = store.commit_vote(&cast).await;

        assert!(matches!(result, Err(StoreError::Duplicate { .. })));
        let user = UserRepository::find_by_id(&store, user.id).await.unwrap().unwrap();
        let event = EventRepository::find_by_id(&store, event.id).await.unwrap().unwrap();
        assert_eq!(user.vote_budget, 5);
        assert_eq!(event.vote_num, 0);
        assert_eq!(store.vote_count(), 1);
    }

    #[tokio::test]
    async fn test_commit_vote_writes_all_three() {
        let store = MemoryStore::new();
        let user = User::new("voter", None, 5).unwrap();
        let event = create_test_event(0);
        UserRepository::save(&store, &user).await.unwrap();
        EventRepository::save(&store, &event).await.unwrap();

        let cast = rslist_engine::cast_vote(&user, &event, 2, Utc::now()).unwrap();
        store.commit_vote(&cast).await.unwrap();

        assert_eq!(store.vote_count(), 1);
        let user = UserRepository::find_by_id(&store, user.id).await.unwrap().unwrap();
        let event = EventRepository::find_by_id(&store, event.id).await.unwrap().unwrap();
        assert_eq!(user.vote_budget, 3);
        assert_eq!(event.vote_num, 2);
    }
}
