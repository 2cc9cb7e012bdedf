//! rslist Service Layer
//!
//! The ranking rules over an abstract [`Store`](rslist_store::Store).
//!
//! # Architecture
//!
//! ```text
//! Command → Service → Engine (decide) → Store (commit write set)
//! ```
//!
//! # Components
//!
//! - **VoteService**: spends a user's vote budget on an event
//! - **SlotAllocator**: sells ranked slots, evicting displaced events
//! - **RankedList**: vote order with purchased slots pinned
//! - **Registry**: creates users and events
//! - **RankingService**: facade over all of the above
//!
//! Every call assumes it is the only writer touching its entities for its
//! duration; the caller (or the store's transaction) provides that.
//!
//! # Example
//!
//! ```rust,ignore
//! use rslist_service::RankingService;
//! use rslist_store::MemoryStore;
//! use std::sync::Arc;
//!
//! let service = RankingService::new(Arc::new(MemoryStore::new()));
//! let user = service.register_user("xiaoli", None, 10).await?;
//! let event = service.submit_event(user.id, "event name", "keyword").await?;
//! let listed = service.list_in_order().await?;
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod listing;
pub mod registry;
pub mod service;
pub mod slots;
pub mod voting;

// Re-exports for convenience
pub use error::{InvalidVoteReason, ServiceError, ServiceResult};
pub use listing::RankedList;
pub use registry::Registry;
pub use service::RankingService;
pub use slots::SlotAllocator;
pub use voting::VoteService;
