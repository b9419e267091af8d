//! Core data models
//!
//! Transactions and budgets as owned by the persistence collaborator, the
//! period key everything is aggregated by, and categorization rules.

pub mod budget;
pub mod ids;
pub mod money;
pub mod period;
pub mod rule;
pub mod timestamp;
pub mod transaction;

pub use budget::{Budget, BudgetValidationError};
pub use ids::{BudgetId, OwnerId, TransactionId};
pub use money::{Money, MoneyParseError};
pub use period::{Period, PeriodParseError};
pub use rule::{default_rules, CategorizationRule};
pub use timestamp::{normalize_period, parse_iso_datetime, OccurredAt};
pub use transaction::{Transaction, TransactionKind, TransactionRecord, UNKNOWN_MERCHANT};
