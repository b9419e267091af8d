//! finance-tracker - personal finance aggregation and categorization
//!
//! Turns a flat list of income and expense transactions into period
//! summaries, category breakdowns, merchant rankings, monthly cashflow and
//! budget comparisons, and assigns categories to merchant names from an
//! ordered keyword rule set.
//!
//! # Architecture
//!
//! - `models`: money, periods, timestamps, transactions, budgets, rules
//! - `reports`: the aggregation engine (pure functions over a snapshot)
//! - `services`: the categorization engine plus transaction, budget and
//!   import services
//! - `storage`: repository traits and a JSON-file store
//! - `config`: path resolution and user settings
//! - `cli` / `display`: the `fintrack` command line
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use finance_tracker::models::{Money, OwnerId, Period, Transaction, TransactionKind};
//! use finance_tracker::reports::summarize_period;
//!
//! let owner = OwnerId::new("user-1");
//! let day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
//! let txns = vec![
//!     Transaction::new(owner.clone(), TransactionKind::Income, Money::from_cents(500_000), "Salary", day),
//!     Transaction::new(owner, TransactionKind::Expense, Money::from_cents(45_000), "Food", day),
//! ];
//!
//! let summary = summarize_period(&txns, &Period::new(2024, 3).unwrap());
//! assert_eq!(summary.net, Money::from_cents(455_000));
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
