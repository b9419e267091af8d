//! CLI commands for budgets

use std::path::PathBuf;

use clap::Subcommand;

use super::report::create_output;
use super::{parse_amount_arg, parse_period_arg};
use crate::config::Settings;
use crate::display::format_budget_list;
use crate::error::TrackerResult;
use crate::models::OwnerId;
use crate::services::BudgetService;
use crate::storage::{BudgetRepository, TransactionRepository};

#[derive(Subcommand, Debug)]
pub enum BudgetCommands {
    /// Set a monthly limit for a category
    Add {
        category: String,
        /// Limit amount (e.g., 5000)
        limit: String,
        /// Period (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        period: Option<String>,
    },

    /// List budgets
    #[command(alias = "ls")]
    List {
        /// Only this period (YYYY-MM)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Remove a budget
    #[command(alias = "rm")]
    Remove {
        /// Budget ID (short or full)
        id: String,
    },

    /// Compare budgets with actual spending
    Status {
        #[arg(short, long)]
        period: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn handle_budget_command(
    budgets: &dyn BudgetRepository,
    transactions: &dyn TransactionRepository,
    settings: &Settings,
    owner: &OwnerId,
    cmd: BudgetCommands,
) -> TrackerResult<()> {
    let service = BudgetService::new(budgets);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        BudgetCommands::Add {
            category,
            limit,
            period,
        } => {
            let period = parse_period_arg(period.as_deref())?;
            let limit = parse_amount_arg(&limit)?;
            let budget = service.create(owner, &category, period, limit)?;
            println!(
                "Created budget {}: {} {} for {}",
                budget.id,
                budget.category,
                budget.limit.format_with_symbol(symbol),
                budget.period
            );
        }

        BudgetCommands::List { period } => {
            let listed = match period {
                Some(p) => service.list_for_period(owner, &parse_period_arg(Some(&p))?)?,
                None => service.list(owner)?,
            };
            print!("{}", format_budget_list(&listed, symbol));
        }

        BudgetCommands::Remove { id } => {
            let budget = service.remove(owner, &id)?;
            println!("Removed budget {} ({} {})", budget.id, budget.category, budget.period);
        }

        BudgetCommands::Status { period, output } => {
            let period = parse_period_arg(period.as_deref())?;
            let snapshot = transactions.list_transactions(owner)?;
            let report = service.status(owner, &period, &snapshot)?;

            match output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Budget report exported to: {}", path.display());
                }
                None => {
                    print!("{}", report.format_terminal(symbol));
                    let over = report.over_budget().count();
                    if over > 0 {
                        println!("{} budget(s) over limit", over);
                    }
                }
            }
        }
    }

    Ok(())
}
