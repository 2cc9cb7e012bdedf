//! Value Objects for the rslist domain
//!
//! Immutable, validated domain primitives.
//! All value objects enforce invariants at construction time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Rank must be a positive slot number
    #[error("Invalid rank: {0}")]
    InvalidRank(String),

    /// Amount must be non-negative
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Names and keywords must be non-empty
    #[error("Invalid name: {0}")]
    InvalidName(String),
}

// =============================================================================
// Rank
// =============================================================================

/// A purchased slot position in the display list (1-indexed).
///
/// "Unranked" is not a `Rank` value: entities carry `Option<Rank>` and use
/// `None` for it.
///
/// # Invariants
/// - Must be >= 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Rank(u32);

impl Rank {
    /// Create a new Rank with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRank` if value is 0
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidRank("Rank must be at least 1".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the slot number
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Zero-based display index this slot pins to
    pub fn index(&self) -> usize {
        (self.0 - 1) as usize
    }
}

impl TryFrom<u32> for Rank {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rank> for u32 {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Amount
// =============================================================================

/// Amount paid for a slot purchase
///
/// # Invariants
/// - Must be >= 0 (a zero bid is a legal first purchase)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Zero amount; the floor of an event with no purchase history
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Create a new Amount with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidAmount` if value < 0
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value < Decimal::ZERO {
            return Err(DomainError::InvalidAmount("Amount must not be negative".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the underlying Decimal value
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = DomainError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trim and reject empty display text
pub(crate) fn validate_text(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

// =============================================================================
// Tests
// =============================================================================
