mod cli;
mod db;
mod engine;
mod error;
mod fmt;
mod importer;
mod ingest;
mod models;
mod reports;
mod settings;

use clap::Parser;

use cli::{AccountsCommands, Cli, Commands, ReportCommands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Accounts { command } => match command {
            AccountsCommands::Add {
                name,
                account_type,
                institution,
                opening_balance,
                limit,
                due_day,
                closing_day,
            } => cli::accounts::add(
                &name,
                &account_type,
                institution.as_deref(),
                opening_balance,
                limit,
                due_day,
                closing_day,
            ),
            AccountsCommands::List => cli::accounts::list(),
        },
        Commands::Import {
            file,
            account,
            document_type,
        } => cli::import::run(&file, &account, &document_type),
        Commands::Report { command } => match command {
            ReportCommands::Balance => cli::report::balance(),
            ReportCommands::Register { account, month } => cli::report::register(account, month),
        },
        Commands::Demo => cli::demo::run(),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
