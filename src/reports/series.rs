//! Income and expense per month across a whole snapshot

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Money, Period, Transaction, TransactionKind};

/// Default number of trailing months on the cashflow view
pub const DEFAULT_CASHFLOW_MONTHS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCashflow {
    pub period: Period,
    pub income: Money,
    pub expense: Money,
}

impl MonthlyCashflow {
    fn empty(period: Period) -> Self {
        Self {
            period,
            income: Money::zero(),
            expense: Money::zero(),
        }
    }

    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Group every transaction by period, oldest period first
///
/// Only periods with at least one transaction appear; transactions without
/// a period key are left out.
pub fn monthly_series(transactions: &[Transaction]) -> Vec<MonthlyCashflow> {
    let mut months: BTreeMap<Period, MonthlyCashflow> = BTreeMap::new();

    for txn in transactions {
        let Some(period) = txn.period else {
            continue;
        };

        let entry = months
            .entry(period)
            .or_insert_with(|| MonthlyCashflow::empty(period));
        match txn.kind {
            TransactionKind::Income => entry.income += txn.amount,
            TransactionKind::Expense => entry.expense += txn.amount,
        }
    }

    months.into_values().collect()
}

/// The most recent `count` entries of a series
pub fn last_months(series: &[MonthlyCashflow], count: usize) -> &[MonthlyCashflow] {
    &series[series.len().saturating_sub(count)..]
}
