use chrono::{Datelike, Local, NaiveDate};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::models::TxnKind;
use crate::settings::db_path;

const CHECKING_NAME: &str = "Conta Corrente";
const CARD_NAME: &str = "Cartao Roxo";

struct DemoTxn {
    date: String,
    description: &'static str,
    kind: TxnKind,
    amount: f64,
}

/// Recurring checking-account activity generated every month.
struct RecurringTxn {
    day: u32,
    description: &'static str,
    kind: TxnKind,
    amount: f64,
}

const CHECKING_RECURRING: &[RecurringTxn] = &[
    RecurringTxn { day: 5, description: "SALARIO EMPRESA XPTO", kind: TxnKind::Income, amount: 5200.00 },
    RecurringTxn { day: 7, description: "ALUGUEL APTO 32", kind: TxnKind::Expense, amount: 1800.00 },
    RecurringTxn { day: 12, description: "SUPERMERCADO PAO DE ACUCAR", kind: TxnKind::Expense, amount: 430.50 },
    RecurringTxn { day: 15, description: "INTERNET VIVO FIBRA", kind: TxnKind::Expense, amount: 99.90 },
    RecurringTxn { day: 20, description: "PIX RECEBIDO FREELA", kind: TxnKind::Income, amount: 600.00 },
    RecurringTxn { day: 22, description: "POSTO IPIRANGA", kind: TxnKind::Expense, amount: 220.00 },
];

const CARD_RECURRING: &[RecurringTxn] = &[
    RecurringTxn { day: 3, description: "IFOOD PEDIDO", kind: TxnKind::Expense, amount: 54.90 },
    RecurringTxn { day: 9, description: "SPOTIFY", kind: TxnKind::Expense, amount: 21.90 },
    RecurringTxn { day: 18, description: "FARMACIA DROGASIL", kind: TxnKind::Expense, amount: 86.40 },
];

/// Installment purchases on the card: (months ago, description,
/// per-slice amount, total slices, paid).
const CARD_INSTALLMENTS: &[(u32, &str, f64, u32, bool)] = &[
    (3, "NOTEBOOK DELL 10X", 250.00, 10, false),
    (5, "GELADEIRA BRASTEMP 5X", 180.00, 5, true),
];

/// Clamp a day to the last valid day of the given year/month.
fn clamp_day(year: i32, month: u32, day: u32) -> u32 {
    let last_day = NaiveDate::from_ymd_opt(year, month + 1, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap())
        .pred_opt()
        .unwrap()
        .day();
    day.min(last_day)
}

fn make_date(year: i32, month: u32, day: u32) -> String {
    let d = clamp_day(year, month, day);
    format!("{year:04}-{month:02}-{d:02}")
}

/// Six months of recurring activity ending at the current month.
fn generate_recurring(recurring: &'static [RecurringTxn]) -> Vec<DemoTxn> {
    let today = Local::now().date_naive();
    let mut txns = Vec::new();
    for months_ago in 0..6u32 {
        let target = today - chrono::Months::new(months_ago);
        for r in recurring {
            txns.push(DemoTxn {
                date: make_date(target.year(), target.month(), r.day),
                description: r.description,
                kind: r.kind,
                amount: r.amount,
            });
        }
    }
    txns
}

fn insert_demo_data(conn: &Connection) -> Result<usize> {
    let today = Local::now().date_naive();

    conn.execute(
        "INSERT INTO accounts (name, account_type, institution, opening_balance) \
         VALUES (?1, 'checking', 'Banco Itau', 2500.00)",
        [CHECKING_NAME],
    )?;
    let checking_id = conn.last_insert_rowid();

    conn.execute(
        "INSERT INTO accounts (name, account_type, institution, credit_limit, due_day, closing_day) \
         VALUES (?1, 'credit_card', 'Nubank', 3000.00, 10, 3)",
        [CARD_NAME],
    )?;
    let card_id = conn.last_insert_rowid();

    let mut count = 0usize;
    for txn in generate_recurring(CHECKING_RECURRING) {
        conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, description, date) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![checking_id, txn.kind.as_str(), txn.amount, txn.description, txn.date],
        )?;
        count += 1;
    }
    for txn in generate_recurring(CARD_RECURRING) {
        conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, description, date) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![card_id, txn.kind.as_str(), txn.amount, txn.description, txn.date],
        )?;
        count += 1;
    }
    for (months_ago, description, amount, total, paid) in CARD_INSTALLMENTS {
        let purchase = today - chrono::Months::new(*months_ago);
        conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, description, date, \
             installment_current, installment_total, installment_paid) \
             VALUES (?1, 'expense', ?2, ?3, ?4, 1, ?5, ?6)",
            rusqlite::params![
                card_id,
                amount,
                description,
                purchase.format("%Y-%m-%d").to_string(),
                total,
                paid
            ],
        )?;
        count += 1;
    }

    Ok(count)
}

pub fn run() -> Result<()> {
    let path = db_path();
    if !path.exists() {
        eprintln!("No database found. Run `bolso init` first.");
        std::process::exit(1);
    }

    let conn = get_connection(&path)?;
    init_db(&conn)?;

    // Idempotency guard
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM accounts WHERE name = ?1)",
        [CHECKING_NAME],
        |r| r.get(0),
    )?;
    if exists {
        println!("Demo data already loaded (account '{CHECKING_NAME}' exists).");
        return Ok(());
    }

    let txn_count = insert_demo_data(&conn)?;

    println!("Demo data loaded!");
    println!("  Accounts:     {CHECKING_NAME}, {CARD_NAME}");
    println!("  Transactions: {txn_count}");
    println!();
    println!("Try these next:");
    println!("  bolso accounts list");
    println!("  bolso report balance");
    println!("  bolso report register --account '{CARD_NAME}'");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::engine::credit_card_usage;
    use crate::reports::fetch_transactions;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_demo_creates_expected_rows() {
        let (_dir, conn) = test_db();
        let count = insert_demo_data(&conn).unwrap();
        // 6 months x (6 checking + 3 card) + 2 installment purchases
        assert_eq!(count, 6 * 9 + 2);
        let accounts: i64 = conn
            .query_row("SELECT count(*) FROM accounts", [], |r| r.get(0))
            .unwrap();
        assert_eq!(accounts, 2);
    }

    #[test]
    fn test_demo_dates_are_valid() {
        let (_dir, conn) = test_db();
        insert_demo_data(&conn).unwrap();
        let dates: Vec<String> = conn
            .prepare("SELECT date FROM transactions")
            .unwrap()
            .query_map([], |r| r.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        for date in dates {
            assert!(
                NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_ok(),
                "invalid date: {date}"
            );
        }
    }

    #[test]
    fn test_demo_card_has_open_exposure() {
        let (_dir, conn) = test_db();
        insert_demo_data(&conn).unwrap();
        let card_id: i64 = conn
            .query_row("SELECT id FROM accounts WHERE name = ?1", [CARD_NAME], |r| r.get(0))
            .unwrap();
        let txns = fetch_transactions(&conn, card_id).unwrap();
        let usage = credit_card_usage(&txns);
        // the unpaid 10 x 250 notebook alone is 2500 of exposure
        assert!(usage >= 2500.0, "usage should include full exposure, got {usage}");
    }

    #[test]
    fn test_demo_guard_is_checkable() {
        let (_dir, conn) = test_db();
        insert_demo_data(&conn).unwrap();
        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM accounts WHERE name = ?1)",
                [CHECKING_NAME],
                |r| r.get(0),
            )
            .unwrap();
        assert!(exists);
    }
}
