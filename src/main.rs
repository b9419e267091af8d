use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use finance_tracker::cli::{
    handle_budget_command, handle_categorize_command, handle_import_command, handle_report_command,
    handle_rules_command, handle_transaction_command, BudgetCommands, ReportCommands,
    TransactionCommands,
};
use finance_tracker::config::{Settings, TrackerPaths};
use finance_tracker::models::OwnerId;
use finance_tracker::storage::JsonStore;

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal finance tracking from the command line",
    long_about = "fintrack records income and expenses, categorizes merchants from \
                  keyword rules, and reports monthly summaries, category spending, \
                  top merchants, cashflow and budget progress."
)]
struct Cli {
    /// Owner whose data to use (defaults to the configured owner)
    #[arg(long, global = true, env = "FINTRACK_OWNER")]
    owner: Option<String>,

    /// Enable debug logging on stderr; overrides FINTRACK_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the settings file and data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Import transactions from a CSV file
    Import {
        /// CSV with merchant, amount, date and type columns
        file: PathBuf,

        /// Preview only; nothing is stored
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the category a merchant name would get
    Categorize { merchant: String },

    /// List categorization rules in evaluation order
    Rules,

    /// Reports over the owner's transactions
    #[command(subcommand)]
    Report(ReportCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    finance_tracker::logging::init(cli.verbose);

    let paths = TrackerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let owner = match cli.owner.as_deref().map(str::trim) {
        Some(o) if !o.is_empty() => OwnerId::new(o),
        _ => settings.default_owner(),
    };
    tracing::debug!(base_dir = %paths.base_dir().display(), owner = %owner, "starting");

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing fintrack at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("{} categorization rules configured.", settings.rules.len());
            println!("Run 'fintrack rules' to see them.");
        }
        Some(Commands::Config) => {
            println!("fintrack Configuration");
            println!("======================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Settings file:     {}", paths.settings_file().display());
            println!("Transactions file: {}", paths.transactions_file().display());
            println!("Budgets file:      {}", paths.budgets_file().display());
            println!("Initialized:       {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency symbol:  {}", settings.currency_symbol);
            println!("  Default owner:    {}", settings.default_owner);
            println!("  Fallback category: {}", settings.default_category);
            println!("  Top merchants:    {}", settings.top_merchants_limit);
            println!("  Cashflow months:  {}", settings.cashflow_months);
            println!("  Rules:            {}", settings.rules.len());
        }
        Some(Commands::Txn(cmd)) => {
            let store = JsonStore::open(&paths)?;
            handle_transaction_command(&store, &settings, &owner, cmd)?;
        }
        Some(Commands::Import { file, dry_run }) => {
            let store = JsonStore::open(&paths)?;
            handle_import_command(&store, &settings, &owner, &file, dry_run)?;
        }
        Some(Commands::Categorize { merchant }) => {
            handle_categorize_command(&settings, &merchant)?;
        }
        Some(Commands::Rules) => {
            handle_rules_command(&settings)?;
        }
        Some(Commands::Report(cmd)) => {
            let store = JsonStore::open(&paths)?;
            handle_report_command(&store, &settings, &owner, cmd)?;
        }
        Some(Commands::Budget(cmd)) => {
            let store = JsonStore::open(&paths)?;
            handle_budget_command(&store, &store, &settings, &owner, cmd)?;
        }
        None => {
            println!("fintrack - personal finance tracking");
            println!();
            println!("Run 'fintrack --help' for usage information.");
        }
    }

    Ok(())
}
