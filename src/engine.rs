//! Balance and installment math. Pure read-side aggregation: callers fetch
//! the full transaction set for an account, the engine folds it, nothing is
//! ever written back. Two deliberately different installment treatments
//! coexist here:
//!
//! * `account_balance` accrues one installment slice per elapsed calendar
//!   month (what the account has actually paid out so far);
//! * `credit_card_usage` counts the full remaining exposure of every unpaid
//!   installment purchase (the whole purchase consumes limit until paid).
//!
//! The asymmetry is intentional and must not be unified.

use chrono::{Datelike, NaiveDate};

use crate::models::{Transaction, TxnKind};

/// Full calendar months elapsed from `purchase` to `today`; a partial
/// month (day-of-month not yet reached) does not count. Never negative.
fn months_elapsed(purchase: NaiveDate, today: NaiveDate) -> i64 {
    let mut months = (today.year() as i64 - purchase.year() as i64) * 12
        + today.month() as i64
        - purchase.month() as i64;
    if today.day() < purchase.day() {
        months -= 1;
    }
    months.max(0)
}

/// How many installment slices have come due by `today`: one at purchase,
/// one more per elapsed month, capped at `total`.
pub fn paid_installments(purchase: NaiveDate, today: NaiveDate, total: u32) -> u32 {
    let due = months_elapsed(purchase, today) + 1;
    (due.clamp(1, total.max(1) as i64)) as u32
}

fn purchase_date(txn: &Transaction, today: NaiveDate) -> NaiveDate {
    NaiveDate::parse_from_str(&txn.date, "%Y-%m-%d").unwrap_or(today)
}

/// Running balance of a regular account: the opening balance plus income,
/// minus expenses, with installment purchases accrued month by month.
/// A `paid` installment settles its full remaining cost at once.
pub fn account_balance(opening_balance: f64, txns: &[Transaction], today: NaiveDate) -> f64 {
    txns.iter().fold(opening_balance, |balance, txn| {
        match txn.kind {
            TxnKind::Income => balance + txn.amount,
            TxnKind::Expense => match txn.installment {
                None => balance - txn.amount,
                Some(inst) if inst.paid => balance - txn.amount * f64::from(inst.total),
                Some(inst) => {
                    let due = paid_installments(purchase_date(txn, today), today, inst.total);
                    balance - txn.amount * f64::from(due)
                }
            },
        }
    })
}

/// "Used" amount of a credit-card account: expenses only. Settled
/// installment purchases no longer count; unpaid ones count their full
/// remaining exposure, not just the elapsed slices.
pub fn credit_card_usage(txns: &[Transaction]) -> f64 {
    txns.iter()
        .filter(|t| t.kind == TxnKind::Expense)
        .map(|t| match t.installment {
            Some(inst) if inst.paid => 0.0,
            Some(inst) => t.amount * f64::from(inst.total),
            None => t.amount,
        })
        .sum()
}

/// Derived, never stored.
pub fn available_limit(credit_limit: f64, usage: f64) -> f64 {
    credit_limit - usage
}
