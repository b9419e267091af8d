//! Aggregation engine
//!
//! Pure functions from a transaction snapshot to summaries, breakdowns,
//! rankings and series. Nothing here holds state or performs I/O; callers
//! pass an immutable slice and get freshly built results back.

pub mod budget_status;
pub mod category;
pub mod merchants;
pub mod series;
pub mod summary;

pub use budget_status::{BudgetComparison, BudgetProgress, BudgetReport};
pub use category::{category_breakdown, CategoryBreakdown, CategoryShare};
pub use merchants::{top_merchants, MerchantTotal, DEFAULT_TOP_MERCHANTS};
pub use series::{last_months, monthly_series, MonthlyCashflow, DEFAULT_CASHFLOW_MONTHS};
pub use summary::{summarize_period, PeriodSummary};
