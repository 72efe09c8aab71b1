use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fintrack::cli::{
    handle_budget_command, handle_dashboard, handle_report_command, handle_transaction_command,
    resolve_owner, BudgetCommands, CommandContext, ReportCommands, TransactionCommands,
};
use fintrack::config::{paths::FinancePaths, settings::Settings};
use fintrack::services::PeriodService;
use fintrack::storage::Storage;

/// Environment variable holding the log filter
const LOG_ENV: &str = "FINTRACK_LOG";

#[derive(Parser)]
#[command(
    name = "fintrack",
    version,
    about = "Personal ledger with monthly budgets and spending reports",
    long_about = "fintrack records income and expenses, keeps monthly budgets per \
                  category (or one general budget for everything else) and shows \
                  balances, category spending and month-by-month trends."
)]
struct Cli {
    /// Whose ledger to work on
    #[arg(long, global = true, env = "FINTRACK_OWNER")]
    owner: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Budget management commands
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Show balance, this month's budgets and recent transactions
    Dashboard,

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Show current configuration and paths
    Config,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = FinancePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    if let Some(Commands::Config) = cli.command {
        if !paths.settings_file().exists() {
            settings.save(&paths)?;
        }

        println!("fintrack Configuration");
        println!("======================");
        println!("Base directory:    {}", paths.base_dir().display());
        println!("Settings file:     {}", paths.settings_file().display());
        println!("Transactions file: {}", paths.transactions_file().display());
        println!("Budgets file:      {}", paths.budgets_file().display());
        println!();
        println!("Settings:");
        println!("  Currency symbol:  {}", settings.currency_symbol);
        println!("  Recent limit:     {}", settings.recent_limit);
        println!("  Trend months:     {}", settings.trend_months);
        println!("  Default category: {}", settings.default_category);
        println!(
            "  Default owner:    {}",
            settings.default_owner.as_deref().unwrap_or("(none)")
        );
        return Ok(());
    }

    let owner = resolve_owner(cli.owner.as_deref(), &settings)?;

    // Initialize storage
    let storage = Storage::open(paths)?;
    let result = {
        let ctx = CommandContext {
            storage: &storage,
            settings: &settings,
            owner,
            periods: PeriodService::new(),
        };

        match cli.command {
            Some(Commands::Transaction(cmd)) => handle_transaction_command(&ctx, cmd),
            Some(Commands::Budget(cmd)) => handle_budget_command(&ctx, cmd),
            Some(Commands::Report(cmd)) => handle_report_command(&ctx, cmd),
            Some(Commands::Dashboard) | None => handle_dashboard(&ctx),
            Some(Commands::Config) => Ok(()),
        }
    };

    // Flush even when the command failed
    storage.close()?;
    result?;
    Ok(())
}
