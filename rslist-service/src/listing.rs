//! Read side: the display ordering and purchase ledgers.

use std::sync::Arc;
use tracing::debug;

use rslist_domain::{Event, EventId, Trade};
use rslist_engine::merge_ranked;
use rslist_store::Store;

use crate::error::{ServiceError, ServiceResult};

/// Produces the display ordering.
pub struct RankedList<S: Store> {
    store: Arc<S>,
}

impl<S: Store> RankedList<S> {
    /// Create a new ranked list reader.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// All events: vote order with purchased slots pinned at `rank - 1`.
    pub async fn list_in_order(&self) -> ServiceResult<Vec<Event>> {
        let by_votes = self.store.events().find_all_by_vote_desc().await?;
        let merged = merge_ranked(by_votes);
        debug!(count = merged.len(), "Listed events");
        Ok(merged)
    }

    /// A single event.
    pub async fn get_event(&self, event_id: EventId) -> ServiceResult<Event> {
        self.store
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or(ServiceError::EventNotFound(event_id))
    }

    /// Purchase history of an event, highest amount first.
    pub async fn trade_history(&self, event_id: EventId) -> ServiceResult<Vec<Trade>> {
        // 404 rather than an empty ledger for unknown events
        self.get_event(event_id).await?;
        Ok(self.store.trades().find_by_event_order_by_amount_desc(event_id).await?)
    }
}
