//! Receipt extraction: a whole document collapses into at most one
//! `expense` — the purchase total — plus a merchant name and a date.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{ExtractedTxn, TxnKind};

use super::amount::parse_amount;
use super::dates::{date_re, to_iso_date};
use super::decode::sanitize_lines;
use super::statement::MAX_DESCRIPTION_LEN;

/// Upper bound on a plausible receipt total. Street numbers, CEP codes and
/// document numbers routinely parse into huge values; anything at or above
/// this is rejected as a wrong match.
const MAX_PLAUSIBLE_TOTAL: f64 = 50_000.0;

fn total_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(TOTAL|VALOR A PAGAR|VALOR PAGO|VALOR)\b").expect("total regex")
    })
}

fn document_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(CNPJ|CPF|CUPOM|COO|CEP)\b").expect("document regex"))
}

fn money_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:R\$\s*)?\d[\d.,]*").expect("money token regex"))
}

fn currency_prefixed_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"R\$\s*\d[\d.,]*").expect("currency prefixed regex"))
}

fn trailing_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d[\d.,]*)\s*$").expect("trailing amount regex"))
}

fn plausible(value: f64) -> bool {
    value > 0.0 && value < MAX_PLAUSIBLE_TOTAL
}

/// Total candidates on one line: every monetary token on total-keyword
/// lines, any `R$`-prefixed token, and a bare trailing amount.
fn total_candidates(line: &str) -> Vec<f64> {
    let mut candidates = Vec::new();
    if document_number_re().is_match(line) {
        return candidates;
    }
    if total_keyword_re().is_match(line) {
        for token in money_token_re().find_iter(line) {
            candidates.push(parse_amount(token.as_str()));
        }
    }
    for token in currency_prefixed_re().find_iter(line) {
        candidates.push(parse_amount(token.as_str()));
    }
    if let Some(caps) = trailing_amount_re().captures(line) {
        candidates.push(parse_amount(&caps[1]));
    }
    candidates.retain(|v| plausible(*v));
    candidates
}

/// The first line that reads like free text: letters, 5-60 chars, not a
/// date, not a total or fiscal-document line.
fn looks_like_merchant(line: &str) -> bool {
    let len = line.chars().count();
    (5..=60).contains(&len)
        && line.chars().any(|c| c.is_alphabetic())
        && !date_re().is_match(line)
        && !total_keyword_re().is_match(line)
        && !document_number_re().is_match(line)
}

/// Scan the receipt for the maximum plausible total, the merchant name and
/// the purchase date. No positive total means no transaction; the pipeline
/// entry point substitutes demo data rather than failing the flow.
pub fn extract_receipt(corpus: &str, today: NaiveDate) -> Option<ExtractedTxn> {
    let lines = sanitize_lines(corpus);

    let mut total = 0.0_f64;
    let mut merchant: Option<String> = None;
    let mut date: Option<String> = None;

    for line in &lines {
        for candidate in total_candidates(line) {
            if candidate > total {
                total = candidate;
            }
        }
        if merchant.is_none() && looks_like_merchant(line) {
            merchant = Some(line.clone());
        }
        if date.is_none() && date_re().is_match(line) {
            date = Some(to_iso_date(line, today));
        }
    }

    if total <= 0.0 {
        return None;
    }

    let description: String = merchant
        .unwrap_or_else(|| "Compra".to_string())
        .chars()
        .take(MAX_DESCRIPTION_LEN)
        .collect();

    Some(ExtractedTxn {
        kind: TxnKind::Expense,
        amount: total,
        description,
        date: date.unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
    })
}
