//! rslist Daemon
//!
//! Serves the vote and slot-purchase ranking over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Start with default configuration (in-memory store)
//! cargo run -p rslistd
//!
//! # Start against PostgreSQL
//! DATABASE_URL=postgres://localhost/rslist cargo run -p rslistd --features postgres
//!
//! # Database maintenance
//! cargo run -p rslistd --features postgres -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `RSLIST_ENV`: Environment (test, development, production)
//! - `RSLIST_API_HOST`: API host (default: 0.0.0.0)
//! - `RSLIST_API_PORT`: API port (default: 8080)
//! - `RSLIST_DEFAULT_VOTE_BUDGET`: Budget of newly registered users (default: 10)
//! - `DATABASE_URL`: PostgreSQL connection (feature `postgres`)

use rslistd::{Config, Daemon};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("rslistd=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("db") {
        return run_db(&args).await;
    }

    // Load configuration
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        api_host = %config.api.host,
        api_port = config.api.port,
        "rslist daemon"
    );

    serve(config).await
}

#[cfg(feature = "postgres")]
async fn serve(config: Config) -> anyhow::Result<()> {
    if config.database_url.is_some() {
        Daemon::new_postgres(config).await?.run().await?;
    } else {
        Daemon::new_memory(config)?.run().await?;
    }
    Ok(())
}

#[cfg(not(feature = "postgres"))]
async fn serve(config: Config) -> anyhow::Result<()> {
    Daemon::new_memory(config)?.run().await?;
    Ok(())
}

#[cfg(feature = "postgres")]
async fn run_db(args: &[String]) -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    rslistd::db::run_db_command(args).await
}

#[cfg(not(feature = "postgres"))]
async fn run_db(_args: &[String]) -> anyhow::Result<()> {
    Err(anyhow::anyhow!("db commands require rslistd built with --features postgres"))
}
