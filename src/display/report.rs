//! Tables for rankings, series, budgets and rules

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Budget, CategorizationRule};
use crate::reports::{MerchantTotal, MonthlyCashflow};

#[derive(Tabled)]
struct MerchantRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Merchant")]
    merchant: String,
    #[tabled(rename = "Spent")]
    total: String,
}

#[derive(Tabled)]
struct CashflowRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Net")]
    net: String,
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Limit")]
    limit: String,
}

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "#")]
    order: usize,
    #[tabled(rename = "Keyword")]
    keyword: String,
    #[tabled(rename = "Category")]
    category: String,
}

pub fn format_top_merchants(merchants: &[MerchantTotal], symbol: &str) -> String {
    if merchants.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let rows = merchants.iter().enumerate().map(|(i, m)| MerchantRow {
        rank: i + 1,
        merchant: m.merchant.clone(),
        total: m.total.format_with_symbol(symbol),
    });
    format!("{}\n", Table::new(rows).with(Style::rounded()))
}

pub fn format_cashflow(series: &[MonthlyCashflow], symbol: &str) -> String {
    if series.is_empty() {
        return "No dated transactions found.\n".to_string();
    }

    let rows = series.iter().map(|m| CashflowRow {
        month: m.period.to_string(),
        income: m.income.format_with_symbol(symbol),
        expense: m.expense.format_with_symbol(symbol),
        net: m.net().format_with_symbol(symbol),
    });
    format!("{}\n", Table::new(rows).with(Style::rounded()))
}

pub fn format_budget_list(budgets: &[Budget], symbol: &str) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n".to_string();
    }

    let rows = budgets.iter().map(|b| BudgetRow {
        id: b.id.to_string(),
        period: b.period.to_string(),
        category: b.category.clone(),
        limit: b.limit.format_with_symbol(symbol),
    });
    format!("{}\n", Table::new(rows).with(Style::rounded()))
}

/// Rules in evaluation order
pub fn format_rules(rules: &[CategorizationRule]) -> String {
    if rules.is_empty() {
        return "No categorization rules configured.\n".to_string();
    }

    let rows = rules.iter().enumerate().map(|(i, r)| RuleRow {
        order: i + 1,
        keyword: r.keyword.clone(),
        category: r.category.clone(),
    });
    format!("{}\n", Table::new(rows).with(Style::rounded()))
}
