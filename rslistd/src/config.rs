//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use std::env;
use std::str::FromStr;

/// Vote budget granted to a newly registered user when the request names none.
pub const DEFAULT_VOTE_BUDGET: u32 = 10;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Ranking configuration
    pub ranking: RankingConfig,

    /// PostgreSQL connection string; the in-memory store is used when absent
    pub database_url: Option<String>,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// Ranking configuration.
#[derive(Debug, Clone)]
pub struct RankingConfig {
    /// Budget of a user registered without an explicit one
    pub default_vote_budget: u32,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let environment = Self::load_environment()?;
        let api = Self::load_api_config()?;
        let ranking = Self::load_ranking_config()?;
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());

        Ok(Self {
            api,
            ranking,
            database_url,
            environment,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            ranking: RankingConfig {
                default_vote_budget: DEFAULT_VOTE_BUDGET,
            },
            database_url: None,
            environment: Environment::Test,
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("RSLIST_ENV").unwrap_or_else(|_| "development".to_string());
        env_str.parse()
    }

    fn load_api_config() -> DaemonResult<ApiConfig> {
        let host = env::var("RSLIST_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = load_parsed_env("RSLIST_API_PORT", 8080u16)?;

        Ok(ApiConfig { host, port })
    }

    fn load_ranking_config() -> DaemonResult<RankingConfig> {
        let default_vote_budget =
            load_parsed_env("RSLIST_DEFAULT_VOTE_BUDGET", DEFAULT_VOTE_BUDGET)?;

        Ok(RankingConfig { default_vote_budget })
    }
}

fn load_parsed_env<T: FromStr>(key: &str, default: T) -> DaemonResult<T> {
    match env::var(key) {
        Ok(val) => parse_value(key, &val),
        Err(_) => Ok(default),
    }
}

fn parse_value<T: FromStr>(key: &str, val: &str) -> DaemonResult<T> {
    val.trim()
        .parse::<T>()
        .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val)))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            ranking: RankingConfig {
                default_vote_budget: DEFAULT_VOTE_BUDGET,
            },
            database_url: None,
            environment: Environment::Development,
        }
    }
}

impl FromStr for Environment {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid RSLIST_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
