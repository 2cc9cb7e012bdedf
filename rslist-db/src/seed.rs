//! Demo data for a fresh rslist database.
//!
//! Seeds one user with a vote budget and a handful of unranked events.

use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use super::Result;

/// User name of the seeded demo user.
pub const DEMO_USER_NAME: &str = "demo";

/// `(name, keyword)` of the seeded events, in submission order.
pub const DEMO_EVENTS: &[(&str, &str)] = &[
    ("Stock market rally", "economy"),
    ("New transit line opens", "city"),
    ("Championship final tonight", "sports"),
];

/// What [`seed_demo_data`] left in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    /// The demo user, existing or new
    pub user_id: Uuid,
    /// Events inserted by this call (0 when already seeded)
    pub events_created: usize,
}

/// Seed the demo user and events.
///
/// Runs in one transaction. When a user named [`DEMO_USER_NAME`] already
/// exists nothing is written and its id is returned.
pub async fn seed_demo_data(pool: &PgPool, vote_budget: u32) -> Result<SeedSummary> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query("SELECT id FROM users WHERE user_name = $1 LIMIT 1")
        .bind(DEMO_USER_NAME)
        .fetch_optional(&mut *tx)
        .await?;

    if let Some(row) = existing {
        let user_id: Uuid = row.get("id");
        info!(%user_id, "Demo data already present");
        tx.commit().await?;
        return Ok(SeedSummary { user_id, events_created: 0 });
    }

    let user_id = Uuid::now_v7();
    info!(%user_id, vote_budget, "Creating demo user");

    sqlx::query(
        r#"
        INSERT INTO users (id, user_name, email, vote_budget, created_at)
        VALUES ($1, $2, NULL, $3, NOW())
        "#,
    )
    .bind(user_id)
    .bind(DEMO_USER_NAME)
    .bind(i64::from(vote_budget))
    .execute(&mut *tx)
    .await?;

    for (name, keyword) in DEMO_EVENTS {
        sqlx::query(
            r#"
            INSERT INTO events (id, user_id, name, keyword, vote_num, rank, created_at)
            VALUES ($1, $2, $3, $4, 0, NULL, NOW())
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(*name)
        .bind(*keyword)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    info!(events = DEMO_EVENTS.len(), "Demo data seeded");
    Ok(SeedSummary { user_id, events_created: DEMO_EVENTS.len() })
}
