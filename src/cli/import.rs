use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::importer::import_document;
use crate::ingest::DocumentKind;
use crate::models::TxnKind;
use crate::settings::db_path;

pub fn run(file: &str, account: &str, document_type: &str) -> Result<()> {
    let document = DocumentKind::parse(document_type)?;
    let file_path = PathBuf::from(file);
    let conn = get_connection(&db_path())?;

    let result = import_document(&conn, &file_path, account, document)?;

    if result.duplicate_file {
        println!("{}", result.message);
        return Ok(());
    }

    println!("{}", result.message);

    if result.fallback {
        // Demo substitution must never pass for real bank data
        let mut table = Table::new();
        table.set_header(vec!["Date", "Description", "Amount"]);
        for txn in &result.sample {
            let amount = match txn.kind {
                TxnKind::Income => money(txn.amount),
                TxnKind::Expense => money(-txn.amount),
            };
            table.add_row(vec![
                Cell::new(&txn.date),
                Cell::new(&txn.description),
                Cell::new(amount),
            ]);
        }
        println!("{table}");
        println!(
            "{}",
            "Warning: these are generated sample rows, not data from your file. \
             Nothing was imported."
                .yellow()
                .bold()
        );
        return Ok(());
    }

    println!(
        "{} imported, {} skipped (duplicates)",
        result.imported, result.skipped
    );

    Ok(())
}
