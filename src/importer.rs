use std::path::Path;

use chrono::Local;
use rusqlite::Connection;
use sha2::{Digest, Sha256};

use crate::error::{BolsoError, Result};
use crate::ingest::{process_document, DocumentKind, FileKind};
use crate::models::ExtractedTxn;

pub struct ImportOutcome {
    pub imported: usize,
    pub skipped: usize,
    pub duplicate_file: bool,
    /// Demo data was substituted for a zero-yield extraction.
    pub fallback: bool,
    /// Generated sample rows on a zero-yield extraction; shown to the user,
    /// never persisted. Empty on a real import.
    pub sample: Vec<ExtractedTxn>,
    pub message: String,
}

fn compute_checksum(file_path: &Path) -> Result<String> {
    let data = std::fs::read(file_path)?;
    let mut hasher = Sha256::new();
    hasher.update(&data);
    Ok(hex::encode(hasher.finalize()))
}

fn is_duplicate_row(conn: &Connection, account_id: i64, txn: &ExtractedTxn) -> bool {
    let mut stmt = conn
        .prepare_cached(
            "SELECT 1 FROM transactions WHERE account_id = ?1 AND date = ?2 AND amount = ?3 \
             AND description = ?4 AND kind = ?5",
        )
        .unwrap();
    stmt.exists(rusqlite::params![
        account_id,
        txn.date,
        txn.amount,
        txn.description,
        txn.kind.as_str()
    ])
    .unwrap_or(false)
}

/// Run a file through the ingestion pipeline and persist the result:
/// whole-file checksum dedup, per-row duplicate skip, and an `imports`
/// audit row that carries the fallback flag.
pub fn import_document(
    conn: &Connection,
    file_path: &Path,
    account_name: &str,
    document: DocumentKind,
) -> Result<ImportOutcome> {
    let account_id: i64 = {
        let mut stmt = conn.prepare("SELECT id FROM accounts WHERE name = ?1")?;
        stmt.query_row([account_name], |row| row.get(0))
            .map_err(|_| BolsoError::UnknownAccount(account_name.to_string()))?
    };

    let checksum = compute_checksum(file_path)?;
    {
        let mut stmt =
            conn.prepare("SELECT 1 FROM imports WHERE checksum = ?1 AND account_id = ?2")?;
        if stmt.exists(rusqlite::params![checksum, account_id])? {
            return Ok(ImportOutcome {
                imported: 0,
                skipped: 0,
                duplicate_file: true,
                fallback: false,
                sample: Vec::new(),
                message: "This file has already been imported (duplicate checksum).".to_string(),
            });
        }
    }

    let bytes = std::fs::read(file_path)?;
    let today = Local::now().date_naive();
    let outcome = process_document(&bytes, document, FileKind::from_path(file_path), today);

    // A zero-yield extraction records the attempt and surfaces the
    // generated sample rows, but none of them reach `transactions`: demo
    // data must never move an account balance.
    if outcome.fallback {
        conn.execute(
            "INSERT INTO imports (filename, account_id, document_type, record_count, \
             is_fallback, checksum) VALUES (?1, ?2, ?3, 0, 1, ?4)",
            rusqlite::params![
                file_path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
                account_id,
                document.as_str(),
                checksum,
            ],
        )?;
        return Ok(ImportOutcome {
            imported: 0,
            skipped: 0,
            duplicate_file: false,
            fallback: true,
            sample: outcome.transactions,
            message: outcome.message,
        });
    }

    let dates: Vec<&str> = outcome.transactions.iter().map(|t| t.date.as_str()).collect();
    let min_date = dates.iter().min().copied();
    let max_date = dates.iter().max().copied();
    conn.execute(
        "INSERT INTO imports (filename, account_id, document_type, record_count, \
         date_range_start, date_range_end, is_fallback, checksum) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            file_path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
            account_id,
            document.as_str(),
            outcome.transactions.len() as i64,
            min_date,
            max_date,
            outcome.fallback,
            checksum,
        ],
    )?;
    let import_id = conn.last_insert_rowid();

    let mut imported = 0usize;
    let mut skipped = 0usize;
    for txn in &outcome.transactions {
        if is_duplicate_row(conn, account_id, txn) {
            skipped += 1;
            continue;
        }
        conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, description, date, import_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                account_id,
                txn.kind.as_str(),
                txn.amount,
                txn.description,
                txn.date,
                import_id
            ],
        )?;
        imported += 1;
    }

    Ok(ImportOutcome {
        imported,
        skipped,
        duplicate_file: false,
        fallback: false,
        sample: Vec::new(),
        message: outcome.message,
    })
}
