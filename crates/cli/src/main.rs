//! Bankdesk CLI - account and loan desk operations from the command line
//!
//! Usage:
//! ```bash
//! bankdesk --role admin --password admin123 account create A1 --name Alice --balance 100
//! bankdesk --role employee --employee-id employee1 --password emp123 account deposit A1 50
//! bankdesk --role user --account A1 loan apply A1 1000 12 --purpose car
//! bankdesk --role admin --password admin123 loan approve LN-1A2B3C4D --confirm
//! bankdesk --role admin --password admin123 audit show
//! ```
//!
//! Every invocation loads the snapshots, authenticates, runs one command and
//! saves on the way out.

use anyhow::{Context, Result};
use bankdesk_business::{AuthConfig, BankService};
use bankdesk_core::AccountType;
use bankdesk_persistence::StorageConfig;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod session;

use commands::{account, admin, audit, loan};

/// Bankdesk - accounts, loans and an audit trail for a small bank desk
#[derive(Parser)]
#[command(name = "bankdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (overrides BANKDESK_DATA_DIR and the config file)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// JSON storage config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Who is at the desk
    #[arg(long, global = true)]
    pub role: Option<RoleArg>,

    /// Admin or employee password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Employee id (employee role)
    #[arg(long, global = true)]
    pub employee_id: Option<String>,

    /// Own account number (user role)
    #[arg(long, global = true)]
    pub account: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Account management
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },

    /// Loan applications
    Loan {
        #[command(subcommand)]
        action: LoanAction,
    },

    /// Change log (admin only)
    Audit {
        #[command(subcommand)]
        action: AuditAction,
    },

    /// Save both snapshots now (admin only)
    Save,

    /// Show bank totals (admin only)
    Status,
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Create a new account
    Create {
        /// Account number
        acc_no: String,
        /// Holder name
        #[arg(long, short)]
        name: String,
        #[arg(long, short, default_value = "")]
        gender: String,
        #[arg(long, short, default_value = "")]
        mobile: String,
        /// Account type
        #[arg(long, short = 't', default_value = "savings")]
        r#type: AccountTypeArg,
        /// Opening balance
        #[arg(long, short, default_value = "0")]
        balance: Decimal,
    },
    /// Delete an account
    Delete { acc_no: String },
    /// Deposit into an account
    Deposit { acc_no: String, amount: Decimal },
    /// Withdraw from an account
    Withdraw { acc_no: String, amount: Decimal },
    /// Show account details
    Show { acc_no: String },
    /// List all accounts
    List,
}

#[derive(Subcommand)]
pub enum LoanAction {
    /// Apply for a loan
    Apply {
        /// Applicant account number
        applicant: String,
        amount: Decimal,
        /// Term in months
        #[arg(allow_negative_numbers = true)]
        term: i64,
        #[arg(long, short, default_value = "")]
        purpose: String,
    },
    /// List the loans visible to the caller
    List,
    /// Approve a pending loan
    Approve {
        loan_id: String,
        /// Approve even if the applicant already holds an approved loan
        #[arg(long)]
        confirm: bool,
    },
    /// Reject a pending loan
    Reject {
        loan_id: String,
        /// Note appended to the loan purpose
        #[arg(long, short)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum AuditAction {
    /// Print every entry
    Show,
    /// Irreversibly truncate the log
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    Admin,
    Employee,
    User,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AccountTypeArg {
    Savings,
    Current,
    Fixed,
}

impl AccountTypeArg {
    pub fn to_core_type(&self) -> AccountType {
        match self {
            AccountTypeArg::Savings => AccountType::Savings,
            AccountTypeArg::Current => AccountType::Current,
            AccountTypeArg::Fixed => AccountType::Fixed,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn storage_config(cli: &Cli) -> Result<StorageConfig> {
    let mut config = match &cli.config {
        Some(path) => StorageConfig::from_file(path)?
            .with_env_overrides(|key| std::env::var(key).ok())?,
        None => StorageConfig::from_env()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = storage_config(&cli).context("Failed to load storage configuration")?;

    let mut service = BankService::open(config);
    for warning in service.load_warnings().iter().filter(|w| w.is_corrupt()) {
        eprintln!("⚠️  {}", warning);
    }

    let auth = AuthConfig::from_env();
    let role = session::login(&cli, &auth, service.accounts())?;

    let outcome = match cli.command {
        Commands::Account { action } => account::handle(&mut service, &role, action),
        Commands::Loan { action } => loan::handle(&mut service, &role, action),
        Commands::Audit { action } => audit::handle(&service, &role, action),
        Commands::Save => admin::save(&service, &role),
        Commands::Status => admin::status(&service, &role),
    };

    // Save on the way out, even when the command failed
    let saved = service.shutdown().context("Failed to save bank state");
    outcome?;
    saved
}
