//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer and the report
//! engine. Handlers print to stdout; diagnostics go through `tracing`.

pub mod budget;
pub mod import;
pub mod report;
pub mod rules;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use import::handle_import_command;
pub use report::{handle_report_command, ReportCommands};
pub use rules::{handle_categorize_command, handle_rules_command};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Money, Period};

/// Period argument, defaulting to the current month
pub(crate) fn parse_period_arg(period: Option<&str>) -> TrackerResult<Period> {
    match period {
        Some(s) => Period::parse(s).map_err(|e| {
            TrackerError::Validation(format!(
                "Invalid period '{}': {}. Use YYYY-MM (e.g., 2024-03)",
                s, e
            ))
        }),
        None => Ok(Period::current()),
    }
}

pub(crate) fn parse_date_arg(date: &str) -> TrackerResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        TrackerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", date))
    })
}

pub(crate) fn parse_amount_arg(amount: &str) -> TrackerResult<Money> {
    Money::parse(amount)
        .map_err(|e| TrackerError::Validation(format!("Invalid amount '{}': {}", amount, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_arg() {
        assert_eq!(
            parse_period_arg(Some("2024-03")).unwrap(),
            Period::new(2024, 3).unwrap()
        );
        assert!(parse_period_arg(Some("March")).unwrap_err().is_validation());
        assert_eq!(parse_period_arg(None).unwrap(), Period::current());
    }

    #[test]
    fn test_parse_amount_and_date_args() {
        assert_eq!(parse_amount_arg("450").unwrap(), Money::from_cents(45_000));
        assert!(parse_amount_arg("lots").is_err());
        assert!(parse_date_arg("2024-02-30").is_err());
        assert_eq!(
            parse_date_arg("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
    }
}
