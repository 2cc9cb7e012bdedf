//! Database lifecycle management for rslist.
//!
//! Provides migration running, status checking, and demo data seeding.

mod seed;

pub use seed::{seed_demo_data, SeedSummary, DEMO_EVENTS, DEMO_USER_NAME};

use sqlx::{PgPool, Row};
use tracing::{info, warn};

/// Result type for DB operations.
pub type Result<T> = std::result::Result<T, anyhow::Error>;

/// Run all pending migrations.
///
/// Uses sqlx migrations from the workspace `migrations` directory.
/// Idempotent: safe to run multiple times.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    sqlx::migrate!("../migrations").run(pool).await?;

    info!("Migrations completed successfully");
    Ok(())
}

/// Check database connectivity and migration status.
///
/// Logs the latest applied migrations and row counts of the ranking tables.
pub async fn status(pool: &PgPool) -> Result<()> {
    let result: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;

    if result != 1 {
        return Err(anyhow::anyhow!("Database connectivity check failed"));
    }

    info!("Database connectivity: OK");

    let rows = sqlx::query(
        r#"
        SELECT version, description, success
        FROM _sqlx_migrations
        ORDER BY version DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool)
    .await;

    match rows {
        Ok(migs) if !migs.is_empty() => {
            info!("Latest migrations:");
            for mig in migs {
                let version: i64 = mig.get("version");
                let description: String = mig.get("description");
                let success: bool = mig.get("success");

                let status = if success { "✓" } else { "✗" };
                info!("  {} v{}: {}", status, version, description);
            }
        },
        Ok(_) => {
            warn!("No migrations found in database (run `rslistd db migrate` first)");
            return Ok(());
        },
        Err(e) => {
            // Table might not exist yet
            if e.to_string().contains("_sqlx_migrations") {
                warn!("Migration table not found (run `rslistd db migrate` first)");
                return Ok(());
            }
            return Err(e.into());
        },
    }

    let counts = sqlx::query(
        r#"
        SELECT
            (SELECT COUNT(*) FROM users) AS users,
            (SELECT COUNT(*) FROM events) AS events,
            (SELECT COUNT(*) FROM events WHERE rank IS NOT NULL) AS ranked,
            (SELECT COUNT(*) FROM votes) AS votes,
            (SELECT COUNT(*) FROM trade_history) AS trades
        "#,
    )
    .fetch_one(pool)
    .await?;

    info!(
        users = counts.get::<i64, _>("users"),
        events = counts.get::<i64, _>("events"),
        ranked = counts.get::<i64, _>("ranked"),
        votes = counts.get::<i64, _>("votes"),
        trades = counts.get::<i64, _>("trades"),
        "Table counts"
    );

    Ok(())
}
