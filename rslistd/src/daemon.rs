//! Daemon: runtime host for the ranking service.
//!
//! # Lifecycle
//!
//! 1. Load configuration
//! 2. Build the store and the ranking service
//! 3. Start API server
//! 4. Serve until SIGINT, then drain in-flight requests

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tracing::{error, info};

use rslist_service::RankingService;
use rslist_store::{MemoryStore, Store};

use crate::api::{create_router, ApiState};
use crate::config::Config;
use crate::error::{DaemonError, DaemonResult};
use crate::metrics::Metrics;

// =============================================================================
// Daemon
// =============================================================================

/// The main rslist daemon.
pub struct Daemon<S: Store + 'static> {
    /// Configuration
    config: Config,
    /// Ranking service, single writer at a time
    service: Arc<RwLock<RankingService<S>>>,
    /// Request counters
    metrics: Arc<Metrics>,
}

impl Daemon<MemoryStore> {
    /// Create a daemon over the in-memory store (for testing/development).
    pub fn new_memory(config: Config) -> DaemonResult<Self> {
        Self::new(config, Arc::new(MemoryStore::new()))
    }
}

#[cfg(feature = "postgres")]
impl Daemon<rslist_store::PgStore> {
    /// Create a daemon over PostgreSQL at `config.database_url`.
    pub async fn new_postgres(config: Config) -> DaemonResult<Self> {
        let url = config
            .database_url
            .clone()
            .ok_or_else(|| DaemonError::Config("DATABASE_URL is not set".to_string()))?;
        let store = rslist_store::PgStore::connect(&url).await?;
        Self::new(config, Arc::new(store))
    }
}

impl<S: Store + 'static> Daemon<S> {
    /// Create a new daemon over the provided store.
    pub fn new(config: Config, store: Arc<S>) -> DaemonResult<Self> {
        Ok(Self {
            config,
            service: Arc::new(RwLock::new(RankingService::new(store))),
            metrics: Arc::new(Metrics::new()?),
        })
    }

    /// Build the API router over this daemon's state.
    pub fn router(&self) -> Router {
        let state = Arc::new(ApiState {
            service: self.service.clone(),
            metrics: self.metrics.clone(),
            default_vote_budget: self.config.ranking.default_vote_budget,
        });
        create_router(state)
    }

    /// Run the daemon.
    ///
    /// This method blocks until shutdown is requested (SIGINT).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            "Starting rslist daemon"
        );

        let (listener, api_addr) = self.bind().await?;
        info!(%api_addr, "API server started");

        let router = self.router();
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("rslist daemon stopped");
        Ok(())
    }

    async fn bind(&self) -> DaemonResult<(TcpListener, SocketAddr)> {
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DaemonError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| DaemonError::Config(format!("Failed to get local address: {}", e)))?;

        Ok((listener, local_addr))
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
}

// =============================================================================
// Tests
// =============================================================================
