//! Database CLI subcommands for rslistd.
//!
//! Provides `db migrate`, `db status`, and `db seed` commands.

use anyhow::{anyhow, Result};
use std::env;
use tracing::info;

use rslist_db::{migrate, seed_demo_data, status};

use crate::config::DEFAULT_VOTE_BUDGET;

/// Run database CLI subcommands.
///
/// Supported commands:
/// - `rslistd db migrate` - Run pending migrations
/// - `rslistd db status` - Check migration status and table counts
/// - `rslistd db seed [--vote-budget N]` - Seed a demo user and events
pub async fn run_db_command(args: &[String]) -> Result<()> {
    if args.len() < 3 {
        return Err(anyhow!("Usage: rslistd db <migrate|status|seed> [options]"));
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| anyhow!("DATABASE_URL environment variable is required for db commands"))?;

    let pool = sqlx::PgPool::connect(&database_url).await?;

    match args[2].as_str() {
        "migrate" => {
            migrate(&pool).await?;
        },
        "status" => {
            status(&pool).await?;
        },
        "seed" => {
            let vote_budget = parse_seed_options(&args[3..])?;
            let summary = seed_demo_data(&pool, vote_budget).await?;
            info!(
                user_id = %summary.user_id,
                events_created = summary.events_created,
                "Seed complete"
            );
        },
        other => {
            return Err(anyhow!("Unknown db command: {}. Use migrate, status, or seed", other));
        },
    }

    Ok(())
}

fn parse_seed_options(options: &[String]) -> Result<u32> {
    let mut vote_budget = DEFAULT_VOTE_BUDGET;

    let mut i = 0;
    while i < options.len() {
        match options[i].as_str() {
            "--vote-budget" => {
                let value = options
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--vote-budget requires a value"))?;
                vote_budget = value.parse()?;
                i += 2;
            },
            unknown => {
                return Err(anyhow!("Unknown option: {}", unknown));
            },
        }
    }

    Ok(vote_budget)
}
