//! Expense totals per category for a period

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Money, Period, Transaction};

/// Per-category expense totals
///
/// Keys are exactly the categories observed among the period's expenses,
/// including an empty category if one was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub period: Period,
    pub totals: BTreeMap<String, Money>,
}

/// One row of a ranked breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: Money,
    /// Share of the period's total expense
    pub percentage: f64,
}

impl CategoryBreakdown {
    /// Amount spent in a category; zero when nothing was spent
    pub fn spent(&self, category: &str) -> Money {
        self.totals.get(category).copied().unwrap_or_default()
    }

    /// Sum of all category totals (equals the period's expense)
    pub fn total(&self) -> Money {
        self.totals.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Categories ordered by amount, largest first
    pub fn ranked(&self) -> Vec<CategoryShare> {
        let total = self.total();
        let mut rows: Vec<CategoryShare> = self
            .totals
            .iter()
            .map(|(category, amount)| CategoryShare {
                category: category.clone(),
                total: *amount,
                percentage: amount.percent_of(total).unwrap_or(0.0),
            })
            .collect();
        rows.sort_by(|a, b| b.total.cmp(&a.total));
        rows
    }

    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("Spending by Category: {}\n", self.period));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No expenses recorded for this period.\n");
            return output;
        }

        output.push_str(&format!("{:<30} {:>18} {:>8}\n", "Category", "Amount", "%"));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for row in self.ranked() {
            let label = if row.category.is_empty() {
                "(none)"
            } else {
                row.category.as_str()
            };
            output.push_str(&format!(
                "{:<30} {:>18} {:>7.1}%\n",
                label,
                row.total.format_with_symbol(symbol),
                row.percentage
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<30} {:>18}\n",
            "TOTAL",
            self.total().format_with_symbol(symbol)
        ));
        output
    }

    /// Export the breakdown as CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> TrackerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["period", "category", "amount", "percentage"])
            .map_err(|e| TrackerError::Export(e.to_string()))?;

        for row in self.ranked() {
            csv.write_record([
                self.period.to_string(),
                row.category,
                row.total.to_string(),
                format!("{:.2}", row.percentage),
            ])
            .map_err(|e| TrackerError::Export(e.to_string()))?;
        }

        csv.flush().map_err(|e| TrackerError::Export(e.to_string()))?;
        Ok(())
    }
}

/// Accumulate expense amounts per category within `period`
pub fn category_breakdown(transactions: &[Transaction], period: &Period) -> CategoryBreakdown {
    let mut totals: BTreeMap<String, Money> = BTreeMap::new();

    for txn in transactions
        .iter()
        .filter(|t| t.is_expense() && t.in_period(period))
    {
        *totals.entry(txn.category.clone()).or_default() += txn.amount;
    }

    CategoryBreakdown {
        period: *period,
        totals,
    }
}
