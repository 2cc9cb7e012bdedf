//! Storage layer errors

use thiserror::Error;

/// Errors raised by a [`Store`](crate::Store) or its repositories.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write referenced an event or user that is not stored
    #[error("{entity_type} {id} not found")]
    NotFound {
        /// Kind of record (event, user)
        entity_type: String,
        /// Its id, or the rank for slot lookups
        id: String,
    },

    /// A unique key is already taken: record id, or a rank held by another event
    #[error("{entity_type} {id} already exists")]
    Duplicate {
        /// What collided (vote, trade, event rank)
        entity_type: String,
        /// The colliding key
        id: String,
    },

    /// The stored row changed between decision and commit
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Backend failure, including rows the domain cannot represent
    #[error("Database error: {0}")]
    Database(String),

    /// A stored rank or amount failed domain validation on load
    #[error("Invalid stored value: {0}")]
    Domain(#[from] rslist_domain::DomainError),
}

impl StoreError {
    /// Create a not found error
    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Create a duplicate error
    pub fn duplicate(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                // unique violation: two events on one rank, or a reused id
                StoreError::Duplicate {
                    entity_type: db_err.table().unwrap_or("row").to_string(),
                    id: db_err.constraint().unwrap_or("unknown").to_string(),
                }
            },
            other => StoreError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rslist_domain::Rank;

    #[test]
    fn test_helpers_and_messages() {
        let missing = StoreError::not_found("event", "42");
        assert!(matches!(&missing, StoreError::NotFound { entity_type, .. } if entity_type == "event"));
        assert_eq!(missing.to_string(), "event 42 not found");

        let taken = StoreError::duplicate("event rank", "1");
        assert_eq!(taken.to_string(), "event rank 1 already exists");
    }

    #[test]
    fn test_invalid_stored_rank_passes_domain_error_through() {
        let err: StoreError = Rank::new(0).unwrap_err().into();
        assert!(matches!(err, StoreError::Domain(_)));
    }
}
