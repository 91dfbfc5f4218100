use crate::error::{BolsoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    Checking,
    Savings,
    CreditCard,
    Investment,
    Other,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::CreditCard => "credit_card",
            Self::Investment => "investment",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit_card" => Ok(Self::CreditCard),
            "investment" => Ok(Self::Investment),
            "other" => Ok(Self::Other),
            _ => Err(BolsoError::UnknownAccountKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnKind {
    Income,
    Expense,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(BolsoError::Other(format!("unknown transaction kind: {s}"))),
        }
    }
}

/// One monthly slice of a purchase split across `total` months. The owning
/// transaction's `amount` is the per-slice amount, so the full purchase
/// price is `amount * total`. Invariant: `1 <= current <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Installment {
    pub current: u32,
    pub total: u32,
    pub paid: bool,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub institution: Option<String>,
    /// Accrual base for non-credit-card accounts.
    pub opening_balance: f64,
    /// Credit ceiling, credit cards only. The available limit is derived,
    /// never stored.
    pub credit_limit: Option<f64>,
    pub due_day: Option<u32>,
    pub closing_day: Option<u32>,
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Option<i64>,
    pub account_id: i64,
    pub kind: TxnKind,
    /// Unsigned magnitude; sign is implied by `kind`.
    pub amount: f64,
    pub description: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub installment: Option<Installment>,
    pub import_id: Option<i64>,
}

/// Candidate transaction produced by the ingestion pipeline before insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTxn {
    pub kind: TxnKind,
    pub amount: f64,
    pub description: String,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_kind_roundtrip() {
        for kind in [
            AccountKind::Checking,
            AccountKind::Savings,
            AccountKind::CreditCard,
            AccountKind::Investment,
            AccountKind::Other,
        ] {
            assert_eq!(AccountKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(AccountKind::parse("wallet").is_err());
    }

    #[test]
    fn test_txn_kind_roundtrip() {
        assert_eq!(TxnKind::parse("income").unwrap(), TxnKind::Income);
        assert_eq!(TxnKind::parse("expense").unwrap(), TxnKind::Expense);
        assert!(TxnKind::parse("transfer").is_err());
    }
}
