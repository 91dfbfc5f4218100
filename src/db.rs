use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    account_type TEXT NOT NULL CHECK (account_type IN
        ('checking', 'savings', 'credit_card', 'investment', 'other')),
    institution TEXT,
    opening_balance REAL NOT NULL DEFAULT 0,
    credit_limit REAL,
    due_day INTEGER CHECK (due_day BETWEEN 1 AND 31),
    closing_day INTEGER CHECK (closing_day BETWEEN 1 AND 31),
    created_at TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS imports (
    id INTEGER PRIMARY KEY,
    filename TEXT NOT NULL,
    account_id INTEGER NOT NULL,
    document_type TEXT NOT NULL CHECK (document_type IN ('receipt', 'statement')),
    import_date TEXT DEFAULT (datetime('now')),
    record_count INTEGER,
    date_range_start TEXT,
    date_range_end TEXT,
    is_fallback INTEGER DEFAULT 0,
    checksum TEXT,
    FOREIGN KEY (account_id) REFERENCES accounts(id)
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY,
    account_id INTEGER NOT NULL,
    kind TEXT NOT NULL CHECK (kind IN ('income', 'expense')),
    amount REAL NOT NULL CHECK (amount >= 0),
    description TEXT NOT NULL,
    date TEXT NOT NULL,
    installment_current INTEGER,
    installment_total INTEGER,
    installment_paid INTEGER,
    import_id INTEGER,
    created_at TEXT DEFAULT (datetime('now')),
    CHECK (
        (installment_current IS NULL AND installment_total IS NULL AND installment_paid IS NULL)
        OR (installment_current IS NOT NULL AND installment_total IS NOT NULL
            AND installment_paid IS NOT NULL
            AND installment_current >= 1 AND installment_total >= installment_current)
    ),
    FOREIGN KEY (account_id) REFERENCES accounts(id),
    FOREIGN KEY (import_id) REFERENCES imports(id)
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_creates_tables() {
        let (_dir, conn) = test_db();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for expected in &["accounts", "transactions", "imports"] {
            assert!(tables.contains(&expected.to_string()), "missing table: {expected}");
        }
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
    }

    #[test]
    fn test_rejects_invalid_account_type() {
        let (_dir, conn) = test_db();
        let res = conn.execute(
            "INSERT INTO accounts (name, account_type) VALUES ('Wallet', 'wallet')",
            [],
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_rejects_inverted_installment_range() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO accounts (name, account_type) VALUES ('Card', 'credit_card')",
            [],
        )
        .unwrap();
        let res = conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, description, date, \
             installment_current, installment_total, installment_paid) \
             VALUES (1, 'expense', 100.0, 'TV', '2025-01-10', 5, 3, 0)",
            [],
        );
        assert!(res.is_err(), "current > total must violate the check");
    }

    #[test]
    fn test_rejects_partial_installment_columns() {
        let (_dir, conn) = test_db();
        conn.execute(
            "INSERT INTO accounts (name, account_type) VALUES ('Card', 'credit_card')",
            [],
        )
        .unwrap();
        let res = conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, description, date, \
             installment_current, installment_total) \
             VALUES (1, 'expense', 100.0, 'TV', '2025-01-10', 1, 5)",
            [],
        );
        assert!(res.is_err(), "paid must be set whenever current/total are");
    }
}
