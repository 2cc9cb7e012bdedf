//! rslist Daemon Library
//!
//! HTTP host for the ranking service.
//!
//! # Architecture
//!
//! ```text
//! HTTP → API handlers → RwLock<RankingService> → Store (memory | PostgreSQL)
//!             ↓
//!          Metrics
//! ```
//!
//! # Components
//!
//! - **Daemon**: builds the store and service, serves until ctrl-c
//! - **API**: REST endpoints for users, events, votes and slot purchases
//! - **Metrics**: Prometheus counters for vote and slot purchase outcomes
//! - **Config**: Environment-based configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use rslistd::{Config, Daemon};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     Daemon::new_memory(config)?.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]

pub mod api;
pub mod config;
pub mod daemon;
#[cfg(feature = "postgres")]
pub mod db;
pub mod error;
pub mod metrics;

// Re-exports for convenience
pub use config::{ApiConfig, Config, Environment, RankingConfig};
pub use daemon::Daemon;
pub use error::{DaemonError, DaemonResult};
pub use metrics::{Metrics, Outcome};
