//! CLI commands for transactions

use clap::Subcommand;

use super::{parse_amount_arg, parse_date_arg, parse_period_arg};
use crate::config::Settings;
use crate::display::format_transaction_table;
use crate::error::{TrackerError, TrackerResult};
use crate::models::{OccurredAt, OwnerId, TransactionKind};
use crate::services::{NewTransaction, TransactionFilter, TransactionService, TransactionUpdate};
use crate::storage::TransactionRepository;

#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// Amount (e.g., 450 or 1,250.50); always positive
        amount: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,
        /// Merchant name
        #[arg(short, long)]
        merchant: Option<String>,
        /// Category; categorized from the merchant when omitted
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List transactions
    #[command(alias = "ls")]
    List {
        /// Period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
        /// income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Exact day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Search category, merchant and notes
        #[arg(short, long)]
        search: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Edit a recorded transaction; only the given fields change
    Edit {
        /// Transaction ID (short or full)
        id: String,
        #[arg(short, long)]
        amount: Option<String>,
        /// income or expense
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        #[arg(short, long)]
        merchant: Option<String>,
        /// Category; an empty value re-categorizes from the merchant
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Remove a transaction
    #[command(alias = "rm")]
    Remove {
        /// Transaction ID (short or full)
        id: String,
    },
}

fn parse_kind(kind: &str) -> TrackerResult<TransactionKind> {
    TransactionKind::parse(kind).ok_or_else(|| {
        TrackerError::Validation(format!(
            "Invalid type '{}'. Use 'income' or 'expense'",
            kind
        ))
    })
}

pub fn handle_transaction_command(
    repository: &dyn TransactionRepository,
    settings: &Settings,
    owner: &OwnerId,
    cmd: TransactionCommands,
) -> TrackerResult<()> {
    let service = TransactionService::new(repository, settings.categorizer());
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            amount,
            kind,
            merchant,
            category,
            date,
            notes,
        } => {
            let amount = parse_amount_arg(&amount)?;
            let kind = parse_kind(&kind)?;
            let occurred_at = match date {
                Some(d) => OccurredAt::from_date(parse_date_arg(&d)?),
                None => OccurredAt::from_date(chrono::Utc::now().date_naive()),
            };

            let txn = service.add(
                owner,
                NewTransaction {
                    kind,
                    amount,
                    category,
                    merchant,
                    notes,
                    occurred_at,
                },
            )?;

            println!("Recorded transaction {}", txn.id);
            println!("  {} {} at {}", txn.kind, txn.amount.format_with_symbol(symbol), txn.merchant_label());
            println!("  Category: {}", txn.category);
        }

        TransactionCommands::List {
            period,
            kind,
            category,
            date,
            search,
            limit,
        } => {
            let filter = TransactionFilter {
                period: period.as_deref().map(|p| parse_period_arg(Some(p))).transpose()?,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                category,
                date: date.as_deref().map(parse_date_arg).transpose()?,
                search,
                limit,
            };

            let transactions = service.list(owner, &filter)?;
            print!("{}", format_transaction_table(&transactions, symbol));
        }

        TransactionCommands::Edit {
            id,
            amount,
            kind,
            merchant,
            category,
            date,
            notes,
        } => {
            let update = TransactionUpdate {
                kind: kind.as_deref().map(parse_kind).transpose()?,
                amount: amount.as_deref().map(parse_amount_arg).transpose()?,
                category,
                merchant,
                notes,
                occurred_at: date
                    .as_deref()
                    .map(parse_date_arg)
                    .transpose()?
                    .map(OccurredAt::from_date),
            };

            let txn = service.update(owner, &id, update)?;

            println!("Updated transaction {}", txn.id);
            println!("  {}", txn);
        }

        TransactionCommands::Remove { id } => {
            let txn = service.remove(owner, &id)?;
            println!("Removed transaction {}", txn.id);
        }
    }

    Ok(())
}
