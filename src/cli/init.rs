use std::path::PathBuf;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{save_settings, shellexpand_path, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = Settings::default();
    if let Some(dir) = data_dir {
        settings.data_dir = shellexpand_path(&dir);
    }

    let dir = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;

    let db_path = dir.join("bolso.db");
    let conn = get_connection(&db_path)?;
    init_db(&conn)?;

    save_settings(&settings)?;

    println!("Initialized bolso.");
    println!("  Data dir: {}", dir.display());
    println!("  Database: {}", db_path.display());
    println!();
    println!("Try these next:");
    println!("  bolso accounts add 'Conta Corrente' --type checking --opening-balance 1000");
    println!("  bolso import extrato.csv --account 'Conta Corrente' --type statement");
    println!("  bolso report balance");
    println!("  bolso demo");

    Ok(())
}
