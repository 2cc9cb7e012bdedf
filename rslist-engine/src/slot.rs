//! Slot purchase decisions.
//!
//! A bid wins when the event is unranked, or when it strictly exceeds the
//! highest amount ever paid for *this* event. The occupant's price is never
//! consulted. Winning a slot held by another event evicts that event.

use chrono::{DateTime, Utc};
use tracing::debug;

use rslist_domain::{Amount, Event, EventId, Rank, Trade};

use crate::error::EngineError;

/// Write set of one accepted slot purchase.
///
/// The buyer, slot and price live only on `trade`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPurchase {
    /// Other event stripped of this rank, if any
    pub evicted: Option<EventId>,
    /// Ledger record to append
    pub trade: Trade,
}

impl SlotPurchase {
    /// Event taking the slot.
    pub fn event_id(&self) -> EventId {
        self.trade.event_id
    }

    /// Slot being taken.
    pub fn rank(&self) -> Rank {
        self.trade.rank
    }

    /// Amount paid.
    pub fn amount(&self) -> Amount {
        self.trade.amount
    }
}

/// Highest amount in a purchase history, `Amount::ZERO` if empty.
pub fn price_floor(history: &[Trade]) -> Amount {
    history.iter().map(|t| t.amount).max().unwrap_or(Amount::ZERO)
}

/// Decide a bid of `bid` by `event` for slot `rank`.
///
/// `floor` is the event's own [`price_floor`]; `occupant` is whichever event
/// currently holds `rank`, if any (it may be `event` itself).
///
/// # Errors
///
/// `EngineError::InsufficientBid` when the event is ranked and `bid <= floor`.
pub fn decide_slot_purchase(
    event: &Event,
    floor: Amount,
    occupant: Option<&Event>,
    bid: Amount,
    rank: Rank,
    traded_at: DateTime<Utc>,
) -> Result<SlotPurchase, EngineError> {
    let free_to_claim = !event.is_ranked();
    if !free_to_claim && bid <= floor {
        return Err(EngineError::InsufficientBid { bid, floor });
    }

    let evicted = occupant.map(|o| o.id).filter(|id| *id != event.id);

    debug!(
        event_id = %event.id,
        %rank,
        %bid,
        %floor,
        free_to_claim,
        evicted = ?evicted,
        "Slot purchase accepted"
    );

    Ok(SlotPurchase {
        evicted,
        trade: Trade::new(event.id, bid, rank, traded_at),
    })
}
