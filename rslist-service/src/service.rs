//! Facade over the ranking components, shared by the daemon.

use std::sync::Arc;

use rslist_domain::{BuySlotCommand, Event, EventId, Trade, User, UserId, VoteCommand};
use rslist_store::Store;

use crate::error::ServiceResult;
use crate::listing::RankedList;
use crate::registry::Registry;
use crate::slots::SlotAllocator;
use crate::voting::VoteService;

/// All ranking operations over one store.
pub struct RankingService<S: Store> {
    voting: VoteService<S>,
    slots: SlotAllocator<S>,
    listing: RankedList<S>,
    registry: Registry<S>,
    store: Arc<S>,
}

impl<S: Store> RankingService<S> {
    /// Create the service and its components over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            voting: VoteService::new(store.clone()),
            slots: SlotAllocator::new(store.clone()),
            listing: RankedList::new(store.clone()),
            registry: Registry::new(store.clone()),
            store,
        }
    }

    /// See [`VoteService::vote`].
    pub async fn vote(&self, command: VoteCommand) -> ServiceResult<()> {
        self.voting.vote(command).await
    }

    /// See [`SlotAllocator::buy_slot`].
    pub async fn buy_slot(&self, command: BuySlotCommand) -> ServiceResult<()> {
        self.slots.buy_slot(command).await
    }

    /// See [`RankedList::list_in_order`].
    pub async fn list_in_order(&self) -> ServiceResult<Vec<Event>> {
        self.listing.list_in_order().await
    }

    /// See [`RankedList::get_event`].
    pub async fn get_event(&self, event_id: EventId) -> ServiceResult<Event> {
        self.listing.get_event(event_id).await
    }

    /// See [`RankedList::trade_history`].
    pub async fn trade_history(&self, event_id: EventId) -> ServiceResult<Vec<Trade>> {
        self.listing.trade_history(event_id).await
    }

    /// See [`Registry::register_user`].
    pub async fn register_user(
        &self,
        user_name: &str,
        email: Option<String>,
        vote_budget: u32,
    ) -> ServiceResult<User> {
        self.registry.register_user(user_name, email, vote_budget).await
    }

    /// See [`Registry::submit_event`].
    pub async fn submit_event(
        &self,
        user_id: UserId,
        name: &str,
        keyword: &str,
    ) -> ServiceResult<Event> {
        self.registry.submit_event(user_id, name, keyword).await
    }

    /// Number of stored events.
    pub async fn event_count(&self) -> ServiceResult<usize> {
        Ok(self.store.events().count().await?)
    }
}
