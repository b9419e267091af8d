//! Merchants ranked by expense total

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Money, Period, Transaction};

/// Number of merchants shown by default
pub const DEFAULT_TOP_MERCHANTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MerchantTotal {
    pub merchant: String,
    pub total: Money,
}

/// Rank merchants by expense, largest first, keeping at most `limit`
///
/// With no `period`, every expense counts. Merchant names are trimmed and
/// blank or missing names are grouped under "Unknown". Equal totals keep the
/// order in which the merchants were first seen.
pub fn top_merchants(
    transactions: &[Transaction],
    period: Option<&Period>,
    limit: usize,
) -> Vec<MerchantTotal> {
    let mut totals: Vec<MerchantTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for txn in transactions
        .iter()
        .filter(|t| t.is_expense())
        .filter(|t| period.map_or(true, |p| t.in_period(p)))
    {
        let merchant = txn.merchant_label();
        match index.get(merchant) {
            Some(&slot) => totals[slot].total += txn.amount,
            None => {
                index.insert(merchant, totals.len());
                totals.push(MerchantTotal {
                    merchant: merchant.to_string(),
                    total: txn.amount,
                });
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals.truncate(limit);
    totals
}
