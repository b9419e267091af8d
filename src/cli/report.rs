//! CLI commands for reports
//!
//! Every report is computed from one snapshot of the owner's transactions.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use super::parse_period_arg;
use crate::config::Settings;
use crate::display::{format_cashflow, format_top_merchants};
use crate::error::{TrackerError, TrackerResult};
use crate::models::OwnerId;
use crate::reports::{category_breakdown, last_months, monthly_series, summarize_period, top_merchants};
use crate::storage::TransactionRepository;

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income, expense and net for a month
    Summary {
        /// Period (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Expense totals by category for a month
    #[command(alias = "spending")]
    Categories {
        #[arg(short, long)]
        period: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merchants ranked by expense
    Merchants {
        /// Restrict to one period (YYYY-MM); all time when omitted
        #[arg(short, long)]
        period: Option<String>,

        /// Number of merchants to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Income and expense per month
    Cashflow {
        /// Number of most recent months to show
        #[arg(short, long)]
        months: Option<usize>,

        /// Show every month with transactions
        #[arg(long, conflicts_with = "months")]
        all: bool,
    },
}

pub fn handle_report_command(
    repository: &dyn TransactionRepository,
    settings: &Settings,
    owner: &OwnerId,
    cmd: ReportCommands,
) -> TrackerResult<()> {
    let transactions = repository.list_transactions(owner)?;
    let symbol = settings.currency_symbol.as_str();
    tracing::debug!(owner = %owner, transactions = transactions.len(), "report snapshot loaded");

    match cmd {
        ReportCommands::Summary { period } => {
            let period = parse_period_arg(period.as_deref())?;
            let summary = summarize_period(&transactions, &period);
            print!("{}", summary.format_terminal(symbol));
        }

        ReportCommands::Categories { period, output } => {
            let period = parse_period_arg(period.as_deref())?;
            let breakdown = category_breakdown(&transactions, &period);

            match output {
                Some(path) => {
                    breakdown.export_csv(create_output(&path)?)?;
                    println!("Category report exported to: {}", path.display());
                }
                None => print!("{}", breakdown.format_terminal(symbol)),
            }
        }

        ReportCommands::Merchants { period, limit } => {
            let period = period
                .as_deref()
                .map(|p| parse_period_arg(Some(p)))
                .transpose()?;
            let limit = limit.unwrap_or(settings.top_merchants_limit);

            let ranked = top_merchants(&transactions, period.as_ref(), limit);
            match period {
                Some(p) => println!("Top Merchants: {}", p),
                None => println!("Top Merchants: all time"),
            }
            print!("{}", format_top_merchants(&ranked, symbol));
        }

        ReportCommands::Cashflow { months, all } => {
            let series = monthly_series(&transactions);
            let shown = if all {
                &series[..]
            } else {
                last_months(&series, months.unwrap_or(settings.cashflow_months))
            };
            print!("{}", format_cashflow(shown, symbol));
        }
    }

    Ok(())
}

/// Open a CSV output file for a report export
pub(crate) fn create_output(path: &Path) -> TrackerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        TrackerError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}
