//! Service layer for finance-tracker
//!
//! The categorization engine plus the collaborator services that sit on top
//! of the storage boundary: validation, auto-categorization and logging.

pub mod budget;
pub mod categorize;
pub mod import;
pub mod transaction;

pub use budget::BudgetService;
pub use categorize::{categorize, categorize_or, Categorizer, DEFAULT_CATEGORY};
pub use import::{
    parse_import_date, ImportPreviewEntry, ImportResult, ImportService, ImportStatus, PREVIEW_ROWS,
};
pub use transaction::{
    distinct_categories, NewTransaction, TransactionFilter, TransactionService, TransactionUpdate,
};
