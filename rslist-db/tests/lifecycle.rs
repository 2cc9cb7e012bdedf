//! Migration and seeding against a real PostgreSQL.
//!
//! Requires DATABASE_URL pointing at a PostgreSQL server:
//! `cargo test -p rslist-db -- --ignored`

use rslist_db::{migrate, seed_demo_data, status, DEMO_EVENTS};

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_migrate_is_idempotent(pool: sqlx::PgPool) {
    migrate(&pool).await.unwrap();
    migrate(&pool).await.unwrap();

    status(&pool).await.unwrap();
}

#[sqlx::test(migrations = "../migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_seed_creates_user_and_events_once(pool: sqlx::PgPool) {
    let first = seed_demo_data(&pool, 10).await.unwrap();
    assert_eq!(first.events_created, DEMO_EVENTS.len());

    let second = seed_demo_data(&pool, 10).await.unwrap();
    assert_eq!(second.user_id, first.user_id);
    assert_eq!(second.events_created, 0);

    let events: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(events, DEMO_EVENTS.len() as i64);

    let budget: i64 = sqlx::query_scalar("SELECT vote_budget FROM users WHERE id = $1")
        .bind(first.user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(budget, 10);
}

#[sqlx::test(migrations = false)]
#[ignore = "requires DATABASE_URL"]
async fn test_status_before_migrate_is_not_an_error(pool: sqlx::PgPool) {
    status(&pool).await.unwrap();
}
