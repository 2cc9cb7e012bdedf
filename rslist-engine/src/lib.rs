//! rslist Engine Layer
//!
//! Pure decision logic, deterministic, no I/O.
//! Takes current entity state → returns the write set to persist.
//!
//! - [`cast_vote`]: debit a budget, credit a score
//! - [`decide_slot_purchase`]: eligibility and eviction for a slot bid
//! - [`merge_ranked`]: pin purchased slots into the vote ordering

#![warn(clippy::all)]

pub mod error;
pub mod merge;
pub mod slot;
pub mod voting;

pub use error::EngineError;
pub use merge::merge_ranked;
pub use slot::{decide_slot_purchase, price_floor, SlotPurchase};
pub use voting::{cast_vote, VoteCast};
