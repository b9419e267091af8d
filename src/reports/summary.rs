//! Income / expense / net for a single period

use serde::Serialize;
use std::fmt;

use crate::models::{Money, Period, Transaction, TransactionKind};

/// Totals for one period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub income: Money,
    pub expense: Money,
    /// Always `income - expense`
    pub net: Money,
}

impl PeriodSummary {
    pub fn empty(period: Period) -> Self {
        Self {
            period,
            income: Money::zero(),
            expense: Money::zero(),
            net: Money::zero(),
        }
    }

    /// Savings as a share of income, `None` when there is no income
    pub fn savings_rate(&self) -> Option<f64> {
        self.net.percent_of(self.income)
    }

    pub fn format_terminal(&self, symbol: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("Summary for {}\n", self.period));
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!("{:<12} {:>20}\n", "Income", self.income.format_with_symbol(symbol)));
        output.push_str(&format!("{:<12} {:>20}\n", "Expense", self.expense.format_with_symbol(symbol)));
        output.push_str(&format!("{:<12} {:>20}\n", "Net", self.net.format_with_symbol(symbol)));
        output
    }
}

impl fmt::Display for PeriodSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: income {} | expense {} | net {}",
            self.period, self.income, self.expense, self.net
        )
    }
}

/// Sum income and expense for transactions in `period`
///
/// Transactions without a period key never match.
pub fn summarize_period(transactions: &[Transaction], period: &Period) -> PeriodSummary {
    let (income, expense) = transactions
        .iter()
        .filter(|t| t.in_period(period))
        .fold((Money::zero(), Money::zero()), |(income, expense), t| match t.kind {
            TransactionKind::Income => (income + t.amount, expense),
            TransactionKind::Expense => (income, expense + t.amount),
        });

    PeriodSummary {
        period: *period,
        income,
        expense,
        net: income - expense,
    }
}
