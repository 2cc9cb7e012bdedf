//! Store failures surface as `ServiceError::Store` and leave no partial writes.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rslist_domain::{Amount, BuySlotCommand, Event, EventId, Rank, User, VoteCommand};
use rslist_engine::{SlotPurchase, VoteCast};
use rslist_service::{RankingService, ServiceError};
use rslist_store::{
    EventRepository, MemoryStore, Store, StoreError, TradeRepository, UserRepository,
    VoteRepository,
};
use rust_decimal_macros::dec;

/// Which part of the backend is down.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Outage {
    Commits,
    EventReads,
}

/// Memory store with one part of the backend failing.
struct BrokenStore {
    inner: MemoryStore,
    outage: Outage,
}

fn backend_down() -> StoreError {
    StoreError::Database("connection reset".to_string())
}

#[async_trait]
impl EventRepository for BrokenStore {
    async fn save(&self, event: &Event) -> Result<(), StoreError> {
        EventRepository::save(&self.inner, event).await
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        if self.outage == Outage::EventReads {
            return Err(backend_down());
        }
        EventRepository::find_by_id(&self.inner, id).await
    }

    async fn find_all_by_vote_desc(&self) -> Result<Vec<Event>, StoreError> {
        if self.outage == Outage::EventReads {
            return Err(backend_down());
        }
        self.inner.find_all_by_vote_desc().await
    }

    async fn find_by_rank(&self, rank: Rank) -> Result<Option<Event>, StoreError> {
        self.inner.find_by_rank(rank).await
    }

    async fn count(&self) -> Result<usize, StoreError> {
        self.inner.count().await
    }
}

#[async_trait]
impl Store for BrokenStore {
    fn events(&self) -> &dyn EventRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        &self.inner
    }

    fn votes(&self) -> &dyn VoteRepository {
        &self.inner
    }

    fn trades(&self) -> &dyn TradeRepository {
        &self.inner
    }

    async fn commit_vote(&self, cast: &VoteCast) -> Result<(), StoreError> {
        if self.outage == Outage::Commits {
            return Err(backend_down());
        }
        self.inner.commit_vote(cast).await
    }

    async fn commit_slot_purchase(&self, purchase: &SlotPurchase) -> Result<(), StoreError> {
        if self.outage == Outage::Commits {
            return Err(backend_down());
        }
        self.inner.commit_slot_purchase(purchase).await
    }
}

async fn setup(outage: Outage) -> (Arc<BrokenStore>, User, Event) {
    let inner = MemoryStore::new();
    let user = User::new("xiaoli", None, 10).unwrap();
    let event = Event::new(user.id, "event", "keyword").unwrap();
    UserRepository::save(&inner, &user).await.unwrap();
    EventRepository::save(&inner, &event).await.unwrap();
    (Arc::new(BrokenStore { inner, outage }), user, event)
}

fn vote(user: &User, event: &Event) -> VoteCommand {
    VoteCommand {
        user_id: user.id,
        event_id: event.id,
        quantity: 3,
        voted_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_vote_commit_failure_records_nothing() {
    let (store, user, event) = setup(Outage::Commits).await;
    let service = RankingService::new(store.clone());

    let result = service.vote(vote(&user, &event)).await;

    assert!(matches!(result, Err(ServiceError::Store(StoreError::Database(_)))));
    assert_eq!(store.inner.vote_count(), 0);
    let user = UserRepository::find_by_id(&store.inner, user.id).await.unwrap().unwrap();
    let event = EventRepository::find_by_id(&store.inner, event.id).await.unwrap().unwrap();
    assert_eq!(user.vote_budget, 10);
    assert_eq!(event.vote_num, 0);
}

#[tokio::test]
async fn test_vote_read_failure_is_not_reported_as_missing_event() {
    let (store, user, event) = setup(Outage::EventReads).await;
    let service = RankingService::new(store.clone());

    let result = service.vote(vote(&user, &event)).await;

    assert!(matches!(result, Err(ServiceError::Store(_))));
    assert_eq!(store.inner.vote_count(), 0);
}

#[tokio::test]
async fn test_buy_slot_commit_failure_keeps_event_unranked() {
    let (store, _, event) = setup(Outage::Commits).await;
    let service = RankingService::new(store.clone());

    let result = service
        .buy_slot(BuySlotCommand {
            event_id: event.id,
            amount: Amount::new(dec!(10)).unwrap(),
            rank: Rank::new(1).unwrap(),
        })
        .await;

    assert!(matches!(result, Err(ServiceError::Store(_))));
    assert_eq!(store.inner.trade_count(), 0);
    let event = EventRepository::find_by_id(&store.inner, event.id).await.unwrap().unwrap();
    assert!(event.rank.is_none());
}

#[tokio::test]
async fn test_listing_read_failure_propagates() {
    let (store, _, event) = setup(Outage::EventReads).await;
    let service = RankingService::new(store);

    assert!(matches!(service.list_in_order().await, Err(ServiceError::Store(_))));
    assert!(matches!(service.trade_history(event.id).await, Err(ServiceError::Store(_))));
}
