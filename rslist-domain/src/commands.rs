//! Already-validated commands handed to the service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{EventId, UserId};
use crate::value_objects::{Amount, Rank};

/// Spend `quantity` of a user's budget on an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCommand {
    pub user_id: UserId,
    pub event_id: EventId,
    pub quantity: u32,
    pub voted_at: DateTime<Utc>,
}

/// Bid `amount` for slot `rank` on behalf of an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuySlotCommand {
    pub event_id: EventId,
    pub amount: Amount,
    pub rank: Rank,
}
