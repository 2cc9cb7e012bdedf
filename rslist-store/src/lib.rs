//! rslist Storage Layer
//!
//! Provides persistence for events, users, votes, and trades.
//!
//! # Architecture
//!
//! - **Repository traits**: Define the storage interface (ports)
//! - **Store**: Unit of work over the repositories; owns write-set atomicity
//! - **In-memory store**: Fast implementation for testing
//! - **PostgreSQL store**: Production implementation (feature `postgres`)
//!
//! # Usage
//!
//! ```rust
//! use rslist_store::{EventRepository, MemoryStore};
//! use rslist_domain::Event;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryStore::new();
//!
//!     let event = Event::new(Uuid::now_v7(), "event name", "keyword").unwrap();
//!     store.save(&event).await.unwrap();
//!
//!     let listed = store.find_all_by_vote_desc().await.unwrap();
//!     println!("Events: {}", listed.len());
//! }
//! ```

#![warn(clippy::all)]

// Modules
mod error;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;
mod repository;

// Re-exports
pub use error::StoreError;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;
pub use repository::{EventRepository, Store, TradeRepository, UserRepository, VoteRepository};
