//! Transaction model
//!
//! `TransactionRecord` is the shape the persistence collaborator stores.
//! `Transaction` is what the rest of the crate works with: the timestamp has
//! been resolved once into a comparable datetime and a period key.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{OwnerId, TransactionId};
use super::money::Money;
use super::period::Period;
use super::timestamp::{normalize_period, OccurredAt};

/// Merchant label used when a transaction has none
pub const UNKNOWN_MERCHANT: &str = "Unknown";

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

impl TransactionKind {
    /// Interpret an imported `type` cell: income only when it says so
    pub fn from_import(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.trim().eq_ignore_ascii_case("income") => Self::Income,
            _ => Self::Expense,
        }
    }

    /// Parse a user-supplied kind, rejecting anything else
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// A transaction as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,

    pub owner: OwnerId,

    pub amount: Money,

    #[serde(rename = "type")]
    pub kind: TransactionKind,

    #[serde(default)]
    pub category: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant: Option<String>,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub occurred_at: Option<OccurredAt>,

    /// Redundant `YYYY-MM` copy of `occurred_at`; kept for the store's own
    /// indexing and not consulted by the aggregation code
    #[serde(default)]
    pub period: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// A transaction with its timestamp resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub owner: OwnerId,
    pub amount: Money,
    pub kind: TransactionKind,
    pub category: String,
    pub merchant: Option<String>,
    pub notes: String,
    /// Original timestamp, kept so the record can be written back unchanged
    pub occurred_at: Option<OccurredAt>,
    /// Comparable datetime, when the timestamp shape allows one
    pub date: Option<DateTime<Utc>>,
    /// Period key; `None` for missing or malformed timestamps
    pub period: Option<Period>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction dated on a calendar day
    pub fn new(
        owner: OwnerId,
        kind: TransactionKind,
        amount: Money,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::with_occurred_at(owner, kind, amount, category, Some(OccurredAt::from_date(date)))
    }

    /// Create a new transaction from any timestamp shape
    pub fn with_occurred_at(
        owner: OwnerId,
        kind: TransactionKind,
        amount: Money,
        category: impl Into<String>,
        occurred_at: Option<OccurredAt>,
    ) -> Self {
        let date = occurred_at.as_ref().and_then(OccurredAt::to_datetime);
        let period = normalize_period(occurred_at.as_ref());
        Self {
            id: TransactionId::new(),
            owner,
            amount,
            kind,
            category: category.into(),
            merchant: None,
            notes: String::new(),
            occurred_at,
            date,
            period,
            created_at: Utc::now(),
        }
    }

    pub fn with_merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Replace the timestamp, re-resolving `date` and `period`
    pub fn set_occurred_at(&mut self, occurred_at: Option<OccurredAt>) {
        self.date = occurred_at.as_ref().and_then(OccurredAt::to_datetime);
        self.period = normalize_period(occurred_at.as_ref());
        self.occurred_at = occurred_at;
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Whether this transaction falls in the given period
    pub fn in_period(&self, period: &Period) -> bool {
        self.period.as_ref() == Some(period)
    }

    /// Trimmed merchant name, or "Unknown" when absent or blank
    pub fn merchant_label(&self) -> &str {
        match self.merchant.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_MERCHANT,
        }
    }

    /// Calendar day in UTC, if the timestamp resolved
    pub fn day(&self) -> Option<NaiveDate> {
        self.date.map(|dt| dt.date_naive())
    }

    /// Convert back to the persisted shape
    ///
    /// The stored period copy is recomputed so it always agrees with
    /// `occurred_at`.
    pub fn to_record(&self) -> TransactionRecord {
        TransactionRecord {
            id: self.id,
            owner: self.owner.clone(),
            amount: self.amount,
            kind: self.kind,
            category: self.category.clone(),
            merchant: self.merchant.clone(),
            notes: self.notes.clone(),
            occurred_at: self.occurred_at.clone(),
            period: self.period.map(|p| p.to_string()),
            created_at: self.created_at,
        }
    }
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let date = record.occurred_at.as_ref().and_then(OccurredAt::to_datetime);
        let period = normalize_period(record.occurred_at.as_ref());
        Self {
            id: record.id,
            owner: record.owner,
            amount: record.amount,
            kind: record.kind,
            category: record.category,
            merchant: record.merchant,
            notes: record.notes,
            occurred_at: record.occurred_at,
            date,
            period,
            created_at: record.created_at,
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = self
            .day()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "----------".to_string());
        write!(
            f,
            "{} {} {} {} ({})",
            day,
            self.kind,
            self.merchant_label(),
            self.amount,
            self.category
        )
    }
}
