use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::money;
use crate::models::AccountKind;
use crate::settings::db_path;

#[allow(clippy::too_many_arguments)]
pub fn add(
    name: &str,
    account_type: &str,
    institution: Option<&str>,
    opening_balance: f64,
    limit: Option<f64>,
    due_day: Option<u32>,
    closing_day: Option<u32>,
) -> Result<()> {
    let kind = AccountKind::parse(account_type)?;
    let conn = get_connection(&db_path())?;
    conn.execute(
        "INSERT INTO accounts (name, account_type, institution, opening_balance, \
         credit_limit, due_day, closing_day) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            name,
            kind.as_str(),
            institution,
            opening_balance,
            limit,
            due_day,
            closing_day
        ],
    )?;
    println!("Added account: {name}");
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = get_connection(&db_path())?;
    let accounts = crate::reports::fetch_accounts(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Type", "Institution", "Opening / Limit"]);
    for account in accounts {
        let figure = match account.kind {
            AccountKind::CreditCard => account
                .credit_limit
                .map(money)
                .unwrap_or_else(|| "-".to_string()),
            _ => money(account.opening_balance),
        };
        table.add_row(vec![
            Cell::new(account.id),
            Cell::new(&account.name),
            Cell::new(account.kind.as_str()),
            Cell::new(account.institution.unwrap_or_default()),
            Cell::new(figure),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}
