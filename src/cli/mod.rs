pub mod accounts;
pub mod demo;
pub mod import;
pub mod init;
pub mod report;
pub mod status;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bolso",
    about = "Personal finance CLI: statement/receipt ingestion and installment-aware balances."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up bolso: choose a data directory and initialize the database.
    Init {
        /// Path for bolso data (default: ~/Documents/bolso)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Manage accounts.
    Accounts {
        #[command(subcommand)]
        command: AccountsCommands,
    },
    /// Ingest a statement or receipt file and store extracted transactions.
    Import {
        /// Path to a CSV, TXT or PDF file
        file: String,
        /// Account name to import into
        #[arg(long)]
        account: String,
        /// Document type: statement, receipt
        #[arg(long = "type", default_value = "statement")]
        document_type: String,
    },
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
    /// Load sample accounts and transactions to explore bolso.
    Demo,
    /// Show current database and summary statistics.
    Status,
}

#[derive(Subcommand)]
pub enum AccountsCommands {
    /// Add a new account.
    Add {
        /// Account name, e.g. 'Conta Corrente Itau'
        name: String,
        /// Account type: checking, savings, credit_card, investment, other
        #[arg(long = "type")]
        account_type: String,
        /// Institution name
        #[arg(long)]
        institution: Option<String>,
        /// Opening balance (non-credit-card accounts)
        #[arg(long = "opening-balance", default_value = "0")]
        opening_balance: f64,
        /// Credit limit (credit cards)
        #[arg(long)]
        limit: Option<f64>,
        /// Billing due day of month, 1-31 (credit cards)
        #[arg(long = "due-day")]
        due_day: Option<u32>,
        /// Statement closing day of month, 1-31 (credit cards)
        #[arg(long = "closing-day")]
        closing_day: Option<u32>,
    },
    /// List all accounts.
    List,
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Per-account balances; credit cards show used and available limit.
    Balance,
    /// Transaction register with installment progress.
    Register {
        /// Filter by account name
        #[arg(long)]
        account: Option<String>,
        /// Month filter: YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
}
