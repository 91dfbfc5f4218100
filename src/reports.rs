use chrono::NaiveDate;
use rusqlite::Connection;

use crate::engine::{account_balance, available_limit, credit_card_usage};
use crate::error::Result;
use crate::models::{Account, AccountKind, Installment, Transaction, TxnKind};

// ---------------------------------------------------------------------------
// Row fetching
// ---------------------------------------------------------------------------

pub fn fetch_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, account_type, institution, opening_balance, credit_limit, \
         due_day, closing_day FROM accounts ORDER BY name",
    )?;
    let rows: Vec<(i64, String, String, Option<String>, f64, Option<f64>, Option<u32>, Option<u32>)> =
        stmt.query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, name, kind, institution, opening_balance, credit_limit, due_day, closing_day)| {
            Ok(Account {
                id,
                name,
                kind: AccountKind::parse(&kind)?,
                institution,
                opening_balance,
                credit_limit,
                due_day,
                closing_day,
            })
        })
        .collect()
}

/// Full transaction set for one account. Fetched in one shot so the engine
/// never computes over a partial set; a storage failure here propagates
/// before any balance math happens.
pub fn fetch_transactions(conn: &Connection, account_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, kind, amount, description, date, installment_current, \
         installment_total, installment_paid, import_id \
         FROM transactions WHERE account_id = ?1 ORDER BY date, id",
    )?;
    let rows: Vec<(i64, String, f64, String, String, Option<u32>, Option<u32>, Option<bool>, Option<i64>)> =
        stmt.query_map([account_id], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(id, kind, amount, description, date, current, total, paid, import_id)| {
            let installment = match (current, total) {
                (Some(current), Some(total)) => Some(Installment {
                    current,
                    total,
                    paid: paid.unwrap_or(false),
                }),
                _ => None,
            };
            Ok(Transaction {
                id: Some(id),
                account_id,
                kind: TxnKind::parse(&kind)?,
                amount,
                description,
                date,
                installment,
                import_id,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Balance report
// ---------------------------------------------------------------------------

pub struct AccountPosition {
    pub name: String,
    pub kind: AccountKind,
    pub balance: f64,
}

pub struct CardPosition {
    pub name: String,
    pub usage: f64,
    pub credit_limit: Option<f64>,
    pub available: Option<f64>,
}

pub struct BalanceReport {
    pub accounts: Vec<AccountPosition>,
    pub cards: Vec<CardPosition>,
    pub total: f64,
}

/// Per-account positions, recomputed from scratch on every call: regular
/// accounts through the accrual engine, credit cards as usage against the
/// limit.
pub fn get_balance(conn: &Connection, today: NaiveDate) -> Result<BalanceReport> {
    let mut accounts = Vec::new();
    let mut cards = Vec::new();

    for account in fetch_accounts(conn)? {
        let txns = fetch_transactions(conn, account.id)?;
        if account.kind == AccountKind::CreditCard {
            let usage = credit_card_usage(&txns);
            cards.push(CardPosition {
                name: account.name,
                usage,
                credit_limit: account.credit_limit,
                available: account.credit_limit.map(|l| available_limit(l, usage)),
            });
        } else {
            accounts.push(AccountPosition {
                name: account.name,
                kind: account.kind,
                balance: account_balance(account.opening_balance, &txns, today),
            });
        }
    }

    let total = accounts.iter().map(|a| a.balance).sum();
    Ok(BalanceReport {
        accounts,
        cards,
        total,
    })
}

// ---------------------------------------------------------------------------
// Register report
// ---------------------------------------------------------------------------

pub struct RegisterRow {
    pub account: String,
    pub date: String,
    pub description: String,
    pub kind: TxnKind,
    pub amount: f64,
    pub installment: Option<Installment>,
}

/// Transaction listing, optionally filtered to one account and one
/// `YYYY-MM` month.
pub fn get_register(
    conn: &Connection,
    account_name: Option<&str>,
    month: Option<&str>,
) -> Result<Vec<RegisterRow>> {
    let mut rows = Vec::new();
    for account in fetch_accounts(conn)? {
        if let Some(filter) = account_name {
            if account.name != filter {
                continue;
            }
        }
        for txn in fetch_transactions(conn, account.id)? {
            if let Some(month) = month {
                if !txn.date.starts_with(month) {
                    continue;
                }
            }
            rows.push(RegisterRow {
                account: account.name.clone(),
                date: txn.date,
                description: txn.description,
                kind: txn.kind,
                amount: txn.amount,
                installment: txn.installment,
            });
        }
    }
    rows.sort_by(|a, b| a.date.cmp(&b.date));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 27).unwrap()
    }

    fn seed(conn: &Connection) {
        conn.execute(
            "INSERT INTO accounts (name, account_type, opening_balance) \
             VALUES ('Conta Corrente', 'checking', 1000.0)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO accounts (name, account_type, credit_limit, due_day, closing_day) \
             VALUES ('Cartao Nu', 'credit_card', 2000.0, 10, 3)",
            [],
        )
        .unwrap();
        // checking: income + plain expense
        conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, description, date) \
             VALUES (1, 'income', 3000.0, 'SALARIO', '2025-08-01'), \
                    (1, 'expense', 450.0, 'ALUGUEL', '2025-08-05')",
            [],
        )
        .unwrap();
        // card: unpaid 100 x 10 bought 3 full months before `today`
        conn.execute(
            "INSERT INTO transactions (account_id, kind, amount, description, date, \
             installment_current, installment_total, installment_paid) \
             VALUES (2, 'expense', 100.0, 'NOTEBOOK 10X', '2025-05-27', 1, 10, 0)",
            [],
        )
        .unwrap();
    }

    #[test]
    fn test_balance_report_uses_engine() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let report = get_balance(&conn, today()).unwrap();
        assert_eq!(report.accounts.len(), 1);
        assert_eq!(report.accounts[0].balance, 1000.0 + 3000.0 - 450.0);
        assert_eq!(report.total, 3550.0);
    }

    #[test]
    fn test_card_position_full_exposure_and_available() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let report = get_balance(&conn, today()).unwrap();
        assert_eq!(report.cards.len(), 1);
        let card = &report.cards[0];
        assert_eq!(card.usage, 1000.0);
        assert_eq!(card.available, Some(1000.0));
    }

    #[test]
    fn test_fetch_transactions_maps_installment() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let txns = fetch_transactions(&conn, 2).unwrap();
        assert_eq!(txns.len(), 1);
        let inst = txns[0].installment.unwrap();
        assert_eq!(inst.current, 1);
        assert_eq!(inst.total, 10);
        assert!(!inst.paid);
    }

    #[test]
    fn test_register_filters_by_account_and_month() {
        let (_dir, conn) = test_db();
        seed(&conn);
        let all = get_register(&conn, None, None).unwrap();
        assert_eq!(all.len(), 3);
        let checking = get_register(&conn, Some("Conta Corrente"), None).unwrap();
        assert_eq!(checking.len(), 2);
        let may = get_register(&conn, None, Some("2025-05")).unwrap();
        assert_eq!(may.len(), 1);
        assert_eq!(may[0].description, "NOTEBOOK 10X");
    }
}
