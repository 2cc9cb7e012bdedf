//! Slot allocation: sell ranked slots to events.
//!
//! # Flow
//!
//! ```text
//! resolve event → floor from own trade history → eligibility
//!   → occupant lookup (evict if another event) → commit
//! ```

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

use rslist_domain::BuySlotCommand;
use rslist_engine::{decide_slot_purchase, price_floor, EngineError};
use rslist_store::Store;

use crate::error::{ServiceError, ServiceResult};

/// Decides and commits slot purchases.
pub struct SlotAllocator<S: Store> {
    store: Arc<S>,
}

impl<S: Store> SlotAllocator<S> {
    /// Create a new slot allocator.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Buy `command.rank` for `command.event_id` at `command.amount`.
    ///
    /// Succeeds when the event holds no slot yet, or when the amount strictly
    /// exceeds the highest amount ever paid for this event. A different event
    /// holding the requested slot loses its rank in the same commit.
    pub async fn buy_slot(&self, command: BuySlotCommand) -> ServiceResult<()> {
        let BuySlotCommand { event_id, amount, rank } = command;

        let event = self
            .store
            .events()
            .find_by_id(event_id)
            .await?
            .ok_or(ServiceError::EventNotFound(event_id))?;

        let history = self.store.trades().find_by_event_order_by_amount_desc(event_id).await?;
        let floor = price_floor(&history);

        let occupant = self.store.events().find_by_rank(rank).await?;

        let purchase =
            match decide_slot_purchase(&event, floor, occupant.as_ref(), amount, rank, Utc::now()) {
                Ok(purchase) => purchase,
                Err(EngineError::InsufficientBid { bid, floor }) => {
                    warn!(%event_id, %rank, %bid, %floor, "Slot purchase rejected");
                    return Err(ServiceError::InsufficientBid { event_id, bid, floor });
                },
                Err(other) => return Err(other.into()),
            };

        self.store.commit_slot_purchase(&purchase).await?;

        match purchase.evicted {
            Some(evicted) => info!(%event_id, %rank, %amount, %evicted, "Slot purchased, occupant evicted"),
            None => info!(%event_id, %rank, %amount, "Slot purchased"),
        }
        Ok(())
    }
}
