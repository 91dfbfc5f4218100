use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::models::TxnKind;
use crate::reports;
use crate::settings::db_path;

pub fn balance() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let today = Local::now().date_naive();
    let report = reports::get_balance(&conn, today)?;

    let mut table = Table::new();
    table.set_header(vec!["Account", "Type", "Balance"]);
    for account in &report.accounts {
        table.add_row(vec![
            Cell::new(&account.name),
            Cell::new(account.kind.as_str()),
            Cell::new(money(account.balance)),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL".bold()),
        Cell::new(""),
        Cell::new(money(report.total).bold()),
    ]);
    println!("Balances\n{table}");

    if !report.cards.is_empty() {
        let mut cards = Table::new();
        cards.set_header(vec!["Card", "Used", "Limit", "Available"]);
        for card in &report.cards {
            cards.add_row(vec![
                Cell::new(&card.name),
                Cell::new(money(card.usage).red()),
                Cell::new(card.credit_limit.map(money).unwrap_or_else(|| "-".to_string())),
                Cell::new(
                    card.available
                        .map(|a| money(a).green().to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ]);
        }
        println!("Credit cards\n{cards}");
    }

    Ok(())
}

pub fn register(account: Option<String>, month: Option<String>) -> Result<()> {
    let conn = get_connection(&db_path())?;
    let rows = reports::get_register(&conn, account.as_deref(), month.as_deref())?;

    let mut table = Table::new();
    table.set_header(vec!["Date", "Account", "Description", "Amount", "Installment"]);
    for row in &rows {
        let amount = match row.kind {
            TxnKind::Income => money(row.amount).green().to_string(),
            TxnKind::Expense => money(-row.amount).red().to_string(),
        };
        let installment = row
            .installment
            .map(|i| {
                if i.paid {
                    format!("{}/{} (paid)", i.current, i.total)
                } else {
                    format!("{}/{}", i.current, i.total)
                }
            })
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&row.date),
            Cell::new(&row.account),
            Cell::new(&row.description),
            Cell::new(amount),
            Cell::new(installment),
        ]);
    }
    println!("Register ({} transactions)\n{table}", rows.len());
    Ok(())
}
