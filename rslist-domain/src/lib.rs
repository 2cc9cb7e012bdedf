//! rslist Domain Layer
//!
//! Pure domain types with zero I/O dependencies.
//! Contains entities, value objects, and the commands the services accept.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
#[allow(missing_docs)]
pub mod commands;
#[allow(missing_docs)]
pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use commands::{BuySlotCommand, VoteCommand};
pub use entities::{Event, EventId, Trade, TradeId, User, UserId, Vote, VoteId};
pub use value_objects::{Amount, DomainError, Rank};
