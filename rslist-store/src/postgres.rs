//! PostgreSQL store implementation.
//!
//! Tables come from the workspace `migrations/` directory: `users`, `events`,
//! `votes`, `trade_history`. A partial unique index on `events(rank)` backs the
//! one-holder-per-slot invariant.
//!
//! This module uses dynamic queries (sqlx::query) instead of compile-time
//! checked macros (sqlx::query!) to allow compilation without DATABASE_URL.

use crate::error::StoreError;
use crate::repository::{EventRepository, Store, TradeRepository, UserRepository, VoteRepository};
use async_trait::async_trait;
use rslist_domain::{Amount, Event, EventId, Rank, Trade, User, UserId, Vote};
use rslist_engine::{SlotPurchase, VoteCast};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::debug;

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and create a store.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }
}

// =============================================================================
// Row conversion
// =============================================================================

const EVENT_COLUMNS: &str = "id, user_id, name, keyword, vote_num, rank, created_at";
const TRADE_COLUMNS: &str = "id, event_id, amount, rank, traded_at";
const VOTE_COLUMNS: &str = "id, user_id, event_id, quantity, voted_at";

fn out_of_range(field: &str, value: impl std::fmt::Display) -> StoreError {
    StoreError::Database(format!("{} out of range: {}", field, value))
}

fn to_i64<T: TryInto<i64>>(field: &str, value: T) -> Result<i64, StoreError> {
    value.try_into().map_err(|_| StoreError::Database(format!("{} out of range", field)))
}

fn rank_to_db(rank: Rank) -> Result<i32, StoreError> {
    i32::try_from(rank.get()).map_err(|_| out_of_range("rank", rank))
}

fn rank_from_db(value: i32) -> Result<Rank, StoreError> {
    let value = u32::try_from(value).map_err(|_| out_of_range("rank", value))?;
    Ok(Rank::new(value)?)
}

fn event_from_row(row: &PgRow) -> Result<Event, StoreError> {
    let vote_num: i64 = row.try_get("vote_num")?;
    let rank: Option<i32> = row.try_get("rank")?;

    Ok(Event {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        name: row.try_get("name")?,
        keyword: row.try_get("keyword")?,
        vote_num: u64::try_from(vote_num)
            .map_err(|_| out_of_range("vote_num", vote_num))?,
        rank: rank.map(rank_from_db).transpose()?,
        created_at: row.try_get("created_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let budget: i64 = row.try_get("vote_budget")?;

    Ok(User {
        id: row.try_get("id")?,
        user_name: row.try_get("user_name")?,
        email: row.try_get("email")?,
        vote_budget: u32::try_from(budget)
            .map_err(|_| out_of_range("vote_budget", budget))?,
        created_at: row.try_get("created_at")?,
    })
}

fn vote_from_row(row: &PgRow) -> Result<Vote, StoreError> {
    let quantity: i64 = row.try_get("quantity")?;

    Ok(Vote {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        event_id: row.try_get("event_id")?,
        quantity: u32::try_from(quantity)
            .map_err(|_| out_of_range("quantity", quantity))?,
        voted_at: row.try_get("voted_at")?,
    })
}

fn trade_from_row(row: &PgRow) -> Result<Trade, StoreError> {
    let amount: Decimal = row.try_get("amount")?;

    Ok(Trade {
        id: row.try_get("id")?,
        event_id: row.try_get("event_id")?,
        amount: Amount::new(amount)?,
        rank: rank_from_db(row.try_get("rank")?)?,
        traded_at: row.try_get("traded_at")?,
    })
}

// =============================================================================
// Event Repository Implementation
// =============================================================================

#[async_trait]
impl EventRepository for PgStore {
    async fn save(&self, event: &Event) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, user_id, name, keyword, vote_num, rank, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                keyword = EXCLUDED.keyword,
                vote_num = EXCLUDED.vote_num,
                rank = EXCLUDED.rank
            "#,
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(&event.name)
        .bind(&event.keyword)
        .bind(to_i64("vote_num", event.vote_num)?)
        .bind(event.rank.map(rank_to_db).transpose()?)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(event_from_row).transpose()
    }

    async fn find_all_by_vote_desc(&self) -> Result<Vec<Event>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM events ORDER BY vote_num DESC, seq ASC",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(event_from_row).collect()
    }

    async fn find_by_rank(&self, rank: Rank) -> Result<Option<Event>, StoreError> {
        let row = sqlx::query(&format!("SELECT {} FROM events WHERE rank = $1", EVENT_COLUMNS))
            .bind(rank_to_db(rank)?)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(event_from_row).transpose()
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as usize)
    }
}

// =============================================================================
// User Repository Implementation
// =============================================================================

#[async_trait]
impl UserRepository for PgStore {
    async fn save(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, user_name, email, vote_budget, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                user_name = EXCLUDED.user_name,
                email = EXCLUDED.email,
                vote_budget = EXCLUDED.vote_budget
            "#,
        )
        .bind(user.id)
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(i64::from(user.vote_budget))
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, user_name, email, vote_budget, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(user_from_row).transpose()
    }
}

// =============================================================================
// Vote Repository Implementation
// =============================================================================

#[async_trait]
impl VoteRepository for PgStore {
    async fn save(&self, vote: &Vote) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO votes (id, user_id, event_id, quantity, voted_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(vote.id)
        .bind(vote.user_id)
        .bind(vote.event_id)
        .bind(i64::from(vote.quantity))
        .bind(vote.voted_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_event(&self, event_id: EventId) -> Result<Vec<Vote>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM votes WHERE event_id = $1 ORDER BY voted_at ASC, id ASC",
            VOTE_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(vote_from_row).collect()
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Vote>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM votes WHERE user_id = $1 ORDER BY voted_at ASC, id ASC",
            VOTE_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(vote_from_row).collect()
    }
}

// =============================================================================
// Trade Repository Implementation
// =============================================================================

#[async_trait]
impl TradeRepository for PgStore {
    async fn save(&self, trade: &Trade) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO trade_history (id, event_id, amount, rank, traded_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(trade.id)
        .bind(trade.event_id)
        .bind(trade.amount.as_decimal())
        .bind(rank_to_db(trade.rank)?)
        .bind(trade.traded_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_event_order_by_amount_desc(
        &self,
        event_id: EventId,
    ) -> Result<Vec<Trade>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM trade_history WHERE event_id = $1 ORDER BY amount DESC, seq ASC",
            TRADE_COLUMNS
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(trade_from_row).collect()
    }
}

// =============================================================================
// Store Implementation
// =============================================================================

#[async_trait]
impl Store for PgStore {
    fn events(&self) -> &dyn EventRepository {
        self
    }

    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn votes(&self) -> &dyn VoteRepository {
        self
    }

    fn trades(&self) -> &dyn TradeRepository {
        self
    }

    /// One transaction; budget and score move by the vote quantity so a
    /// concurrent writer is detected instead of overwritten.
    async fn commit_vote(&self, cast: &VoteCast) -> Result<(), StoreError> {
        let quantity = i64::from(cast.vote.quantity);
        let mut tx = self.pool.begin().await?;

        let debited = sqlx::query(
            "UPDATE users SET vote_budget = vote_budget - $2 WHERE id = $1 AND vote_budget >= $2",
        )
        .bind(cast.user.id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;
        if debited.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(StoreError::Conflict(format!(
                "vote budget of user {} changed during vote",
                cast.user.id
            )));
        }

        let credited = sqlx::query("UPDATE events SET vote_num = vote_num + $2 WHERE id = $1")
            .bind(cast.event.id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        if credited.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(StoreError::not_found("event", cast.event.id.to_string()));
        }

        sqlx::query(
            "INSERT INTO votes (id, user_id, event_id, quantity, voted_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(cast.vote.id)
        .bind(cast.vote.user_id)
        .bind(cast.vote.event_id)
        .bind(quantity)
        .bind(cast.vote.voted_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(vote_id = %cast.vote.id, "Vote committed");
        Ok(())
    }

    /// Evict, assign and append the trade in one transaction.
    async fn commit_slot_purchase(&self, purchase: &SlotPurchase) -> Result<(), StoreError> {
        let rank = rank_to_db(purchase.rank())?;
        let mut tx = self.pool.begin().await?;

        if let Some(evicted_id) = purchase.evicted {
            sqlx::query("UPDATE events SET rank = NULL WHERE id = $1 AND rank = $2")
                .bind(evicted_id)
                .bind(rank)
                .execute(&mut *tx)
                .await?;
        }

        let assigned = sqlx::query("UPDATE events SET rank = $2 WHERE id = $1")
            .bind(purchase.event_id())
            .bind(rank)
            .execute(&mut *tx)
            .await?;
        if assigned.rows_affected() != 1 {
            tx.rollback().await?;
            return Err(StoreError::not_found("event", purchase.event_id().to_string()));
        }

        sqlx::query(
            "INSERT INTO trade_history (id, event_id, amount, rank, traded_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(purchase.trade.id)
        .bind(purchase.trade.event_id)
        .bind(purchase.trade.amount.as_decimal())
        .bind(rank)
        .bind(purchase.trade.traded_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(event_id = %purchase.event_id(), rank = %purchase.rank(), "Slot purchase committed");
        Ok(())
    }
}
