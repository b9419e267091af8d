//! Display formatting for terminal output

pub mod report;
pub mod transaction;

pub use report::{format_budget_list, format_cashflow, format_rules, format_top_merchants};
pub use transaction::{format_import_preview, format_transaction_table, truncate};
