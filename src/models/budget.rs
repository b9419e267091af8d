//! Budget model
//!
//! A spending limit for one category within one period. At most one budget
//! exists per (owner, category, period); `BudgetService` enforces that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, OwnerId};
use super::money::Money;
use super::period::Period;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,

    pub owner: OwnerId,

    /// Category this limit applies to (matched exactly against transactions)
    pub category: String,

    pub period: Period,

    /// Spending limit for the period
    pub limit: Money,

    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(owner: OwnerId, category: impl Into<String>, period: Period, limit: Money) -> Self {
        Self {
            id: BudgetId::new(),
            owner,
            category: category.into(),
            period,
            limit,
            created_at: Utc::now(),
        }
    }

    /// Whether this budget occupies the same (owner, category, period) slot
    pub fn conflicts_with(&self, other: &Budget) -> bool {
        self.owner == other.owner && self.category == other.category && self.period == other.period
    }

    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.category.trim().is_empty() {
            return Err(BudgetValidationError::MissingCategory);
        }

        if !self.limit.is_positive() {
            return Err(BudgetValidationError::NonPositiveLimit);
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: limit {}", self.period, self.category, self.limit)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    MissingCategory,
    NonPositiveLimit,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCategory => write!(f, "Budget category is required"),
            Self::NonPositiveLimit => write!(f, "Budget limit must be positive"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}
