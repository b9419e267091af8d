//! Transaction and import preview tables

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Transaction;
use crate::services::{ImportPreviewEntry, ImportStatus};

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Merchant")]
    merchant: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Tabled)]
struct PreviewRow {
    #[tabled(rename = "Line")]
    line: u64,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Merchant")]
    merchant: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Auto Category")]
    category: String,
}

fn format_day(txn: &Transaction) -> String {
    txn.day()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_transaction_table(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let rows = transactions.iter().map(|txn| TransactionRow {
        id: txn.id.to_string(),
        date: format_day(txn),
        kind: txn.kind.to_string(),
        merchant: truncate(txn.merchant_label(), 28),
        category: txn.category.clone(),
        amount: txn.amount.format_with_symbol(symbol),
    });

    format!("{}\n", Table::new(rows).with(Style::rounded()))
}

/// Table of the first `limit` preview rows
pub fn format_import_preview(entries: &[ImportPreviewEntry], symbol: &str, limit: usize) -> String {
    if entries.is_empty() {
        return "No rows found.\n".to_string();
    }

    let rows = entries.iter().take(limit).map(|entry| {
        let (amount, category) = match &entry.status {
            ImportStatus::Ready(txn) => (txn.amount.format_with_symbol(symbol), txn.category.clone()),
            ImportStatus::Error(message) => (entry.raw_amount.clone(), format!("error: {}", message)),
        };
        PreviewRow {
            line: entry.row_number,
            date: entry.raw_date.clone(),
            merchant: truncate(&entry.merchant, 28),
            amount,
            category,
        }
    });

    let mut output = format!("{}\n", Table::new(rows).with(Style::rounded()));
    if entries.len() > limit {
        output.push_str(&format!("Showing first {} of {} rows\n", limit, entries.len()));
    }
    output
}

/// Shorten to `max_chars`, counting characters rather than bytes
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
