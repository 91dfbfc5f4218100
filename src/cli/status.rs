use crate::db::get_connection;
use crate::error::Result;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("bolso.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let conn = get_connection(&db_path)?;

        let accounts: i64 = conn.query_row("SELECT count(*) FROM accounts", [], |r| r.get(0))?;
        let transactions: i64 =
            conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))?;
        let imports: i64 = conn.query_row("SELECT count(*) FROM imports", [], |r| r.get(0))?;
        let fallback_imports: i64 = conn.query_row(
            "SELECT count(*) FROM imports WHERE is_fallback = 1",
            [],
            |r| r.get(0),
        )?;
        let last_import: Option<String> = conn
            .query_row(
                "SELECT filename FROM imports ORDER BY id DESC LIMIT 1",
                [],
                |r| r.get(0),
            )
            .ok();

        println!();
        println!("Accounts:      {accounts}");
        println!("Transactions:  {transactions}");
        println!("Imports:       {imports} ({fallback_imports} yielded no data)");
        if let Some(filename) = last_import {
            println!("Last import:   {filename}");
        }
    } else {
        println!();
        println!("Database not found. Run `bolso init` to set up.");
    }

    Ok(())
}
