//! Budget vs. actual for a period
//!
//! Spending comes from the category breakdown; this module only joins it
//! against budget rows.

use serde::Serialize;
use std::fmt;
use std::io::Write;

use super::category::{category_breakdown, CategoryBreakdown};
use crate::error::{TrackerError, TrackerResult};
use crate::models::{Budget, BudgetId, Money, Period, Transaction};

/// How far through a budget the spending is
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "percent", rename_all = "lowercase")]
pub enum BudgetProgress {
    /// `spent / limit * 100`; may exceed 100
    Percent(f64),
    /// The limit is zero, so no ratio exists
    Undefined,
}

impl BudgetProgress {
    pub fn from_amounts(spent: Money, limit: Money) -> Self {
        spent
            .percent_of(limit)
            .map(Self::Percent)
            .unwrap_or(Self::Undefined)
    }

    /// Percentage clamped to 0..=100 for progress bars
    pub fn bar_fill(&self) -> Option<f64> {
        match self {
            Self::Percent(p) => Some(p.clamp(0.0, 100.0)),
            Self::Undefined => None,
        }
    }
}

impl fmt::Display for BudgetProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(p) => write!(f, "{:.1}%", p),
            Self::Undefined => write!(f, "n/a"),
        }
    }
}

/// One budget row compared against actual spending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    pub budget_id: BudgetId,
    pub category: String,
    pub period: Period,
    pub limit: Money,
    pub spent: Money,
    /// `limit - spent`; negative when overspent
    pub remaining: Money,
    pub progress: BudgetProgress,
}

impl BudgetComparison {
    pub fn new(budget: &Budget, breakdown: &CategoryBreakdown) -> Self {
        let spent = breakdown.spent(&budget.category);
        Self {
            budget_id: budget.id,
            category: budget.category.clone(),
            period: budget.period,
            limit: budget.limit,
            spent,
            remaining: budget.limit - spent,
            progress: BudgetProgress::from_amounts(spent, budget.limit),
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_negative()
    }
}

/// All budgets of a period with their spending
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetReport {
    pub period: Period,
    pub rows: Vec<BudgetComparison>,
    pub total_limit: Money,
    pub total_spent: Money,
}

impl BudgetReport {
    /// Compare the period's budgets against the transaction snapshot
    ///
    /// Budgets for other periods are ignored.
    pub fn generate(budgets: &[Budget], transactions: &[Transaction], period: &Period) -> Self {
        let breakdown = category_breakdown(transactions, period);

        let mut rows: Vec<BudgetComparison> = budgets
            .iter()
            .filter(|b| &b.period == period)
            .map(|b| BudgetComparison::new(b, &breakdown))
            .collect();
        rows.sort_by(|a, b| a.category.cmp(&b.category));

        let total_limit = rows.iter().map(|r| r.limit).sum();
        let total_spent = rows.iter().map(|r| r.spent).sum();

        Self {
            period: *period,
            rows,
            total_limit,
            total_spent,
        }
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetComparison> {
        self.rows.iter().filter(|r| r.is_over_budget())
    }

    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("Budget Status: {}\n", self.period));
        output.push_str(&"=".repeat(80));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No budgets set for this period.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<24} {:>16} {:>16} {:>16} {:>6}\n",
            "Category", "Limit", "Spent", "Remaining", "Used"
        ));
        output.push_str(&"-".repeat(80));
        output.push('\n');

        for row in &self.rows {
            let marker = if row.is_over_budget() { " !" } else { "" };
            output.push_str(&format!(
                "{:<24} {:>16} {:>16} {:>16} {:>6}{}\n",
                row.category,
                row.limit.format_with_symbol(symbol),
                row.spent.format_with_symbol(symbol),
                row.remaining.format_with_symbol(symbol),
                row.progress.to_string(),
                marker
            ));
        }

        output.push_str(&"-".repeat(80));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>16} {:>16} {:>16}\n",
            "TOTAL",
            self.total_limit.format_with_symbol(symbol),
            self.total_spent.format_with_symbol(symbol),
            (self.total_limit - self.total_spent).format_with_symbol(symbol)
        ));
        output
    }

    /// Export the report as CSV; undefined progress is written as an empty cell
    pub fn export_csv<W: Write>(&self, writer: W) -> TrackerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["period", "category", "limit", "spent", "remaining", "percentage"])
            .map_err(|e| TrackerError::Export(e.to_string()))?;

        for row in &self.rows {
            let percentage = match row.progress {
                BudgetProgress::Percent(p) => format!("{:.2}", p),
                BudgetProgress::Undefined => String::new(),
            };
            csv.write_record([
                row.period.to_string(),
                row.category.clone(),
                row.limit.to_string(),
                row.spent.to_string(),
                row.remaining.to_string(),
                percentage,
            ])
            .map_err(|e| TrackerError::Export(e.to_string()))?;
        }

        csv.flush().map_err(|e| TrackerError::Export(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OwnerId, TransactionKind};
    use chrono::NaiveDate;

    fn owner() -> OwnerId {
        OwnerId::new("user-1")
    }

    fn march() -> Period {
        Period::new(2024, 3).unwrap()
    }

    fn expense(category: &str, cents: i64) -> Transaction {
        Transaction::new(
            owner(),
            TransactionKind::Expense,
            Money::from_cents(cents),
            category,
            NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
        )
    }

    #[test]
    fn test_comparison_math() {
        let budget = Budget::new(owner(), "Food", march(), Money::from_cents(10_000));
        let breakdown = category_breakdown(&[expense("Food", 2_500)], &march());

        let row = BudgetComparison::new(&budget, &breakdown);
        assert_eq!(row.spent.cents(), 2_500);
        assert_eq!(row.remaining.cents(), 7_500);
        assert_eq!(row.progress, BudgetProgress::Percent(25.0));
        assert!(!row.is_over_budget());
    }

    #[test]
    fn test_no_spending_means_zero() {
        let budget = Budget::new(owner(), "Travel", march(), Money::from_cents(10_000));
        let breakdown = category_breakdown(&[expense("Food", 2_500)], &march());

        let row = BudgetComparison::new(&budget, &breakdown);
        assert_eq!(row.spent, Money::zero());
        assert_eq!(row.progress, BudgetProgress::Percent(0.0));
    }

    #[test]
    fn test_zero_limit_is_undefined_progress() {
        let mut budget = Budget::new(owner(), "Food", march(), Money::from_cents(1));
        budget.limit = Money::zero();
        let breakdown = category_breakdown(&[expense("Food", 5_000)], &march());

        let row = BudgetComparison::new(&budget, &breakdown);
        assert_eq!(row.progress, BudgetProgress::Undefined);
        assert_eq!(row.progress.to_string(), "n/a");
        assert_eq!(row.progress.bar_fill(), None);
        assert_eq!(row.remaining.cents(), -5_000);
    }

    #[test]
    fn test_overspent_row() {
        let budget = Budget::new(owner(), "Food", march(), Money::from_cents(1_000));
        let breakdown = category_breakdown(&[expense("Food", 1_500)], &march());

        let row = BudgetComparison::new(&budget, &breakdown);
        assert!(row.is_over_budget());
        assert_eq!(row.progress, BudgetProgress::Percent(150.0));
        assert_eq!(row.progress.bar_fill(), Some(100.0));
    }

    #[test]
    fn test_report_filters_period_and_totals() {
        let budgets = vec![
            Budget::new(owner(), "Travel", march(), Money::from_cents(4_000)),
            Budget::new(owner(), "Food", march(), Money::from_cents(1_000)),
            Budget::new(owner(), "Food", march().next(), Money::from_cents(9_999)),
        ];
        let txns = vec![expense("Food", 1_500), expense("Travel", 500)];

        let report = BudgetReport::generate(&budgets, &txns, &march());
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].category, "Food");
        assert_eq!(report.total_limit.cents(), 5_000);
        assert_eq!(report.total_spent.cents(), 2_000);
        assert_eq!(report.over_budget().count(), 1);
    }

    #[test]
    fn test_csv_leaves_undefined_percentage_blank() {
        let mut budget = Budget::new(owner(), "Food", march(), Money::from_cents(1));
        budget.limit = Money::zero();
        let report = BudgetReport::generate(&[budget], &[expense("Food", 5_000)], &march());

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("2024-03,Food,0.00,50.00,-50.00,\n"));
        assert!(!text.contains("inf"));
        assert!(!text.contains("NaN"));
    }
}
