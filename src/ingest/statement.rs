//! Bank-statement extraction: a delimited (CSV) path and a free-text
//! line-pattern path. CSV structure is a stronger signal than free-text
//! heuristics, so when the delimited path yields anything at all it wins
//! for the whole document.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::{ExtractedTxn, TxnKind};

use super::amount::{has_minus, has_plus, parse_amount};
use super::dates::{date_re, to_iso_date};
use super::decode::clean_lines;

/// Descriptions are capped for storage hygiene.
pub const MAX_DESCRIPTION_LEN: usize = 100;
/// Anything shorter after trimming is not a description.
const MIN_DESCRIPTION_LEN: usize = 3;

fn amount_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\s*(?:R\$\s*)?\d[\d.,]*$").expect("amount token regex"))
}

fn trailing_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"([+-]?(?:R\$\s*)?\d[\d.,]*)\s*$").expect("trailing amount regex")
    })
}

fn date_desc_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\s+(.+?)\s+([+-]?(?:R\$\s*)?\d[\d.,]*)$")
            .expect("date desc amount regex")
    })
}

fn keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(PIX|TED|DOC|COMPRA|PAGAMENTO|SAQUE|DEP[ÓO]SITO|TRANSFER[ÊE]NCIA|D[ÉE]BITO|CR[ÉE]DITO)\b",
        )
        .expect("keyword regex")
    })
}

fn desc_date_amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(.+?)\s+(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\s+(.+?)\s+([+-]?(?:R\$\s*)?\d[\d.,]*)$",
        )
        .expect("desc date amount regex")
    })
}

fn two_amounts_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+?)\s+([+-]?\d[\d.,]*)\s+([+-]?\d[\d.,]*)$").expect("two amounts regex")
    })
}

fn credit_vocab_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(RECEBID[OA]S?|DEP[ÓO]SITO|CR[ÉE]DITO|SAL[ÁA]RIO|RENDIMENTO|RECEITA|ESTORNO)\b",
        )
        .expect("credit vocab regex")
    })
}

/// Income iff the raw amount token carries an explicit `+`, or carries no
/// `-` and the description uses credit vocabulary. Heuristic sign
/// inference, not authoritative bank data; misclassification is a known
/// failure mode.
pub fn classify_kind(amount_token: &str, description: &str) -> TxnKind {
    if has_plus(amount_token) {
        TxnKind::Income
    } else if !has_minus(amount_token) && credit_vocab_re().is_match(description) {
        TxnKind::Income
    } else {
        TxnKind::Expense
    }
}

fn truncate_description(desc: &str) -> String {
    desc.trim().chars().take(MAX_DESCRIPTION_LEN).collect()
}

/// Record-level validity gate: zero amounts and too-short descriptions are
/// non-transactions, silently dropped rather than errored.
fn make_candidate(amount_token: &str, description: &str, date: String) -> Option<ExtractedTxn> {
    let amount = parse_amount(amount_token);
    let description = truncate_description(description);
    if amount == 0.0 || description.chars().count() < MIN_DESCRIPTION_LEN {
        return None;
    }
    let kind = classify_kind(amount_token, &description);
    Some(ExtractedTxn {
        kind,
        amount,
        description,
        date,
    })
}

/// Apply the ordered pattern set to one cleaned line; first match wins.
pub fn extract_line(line: &str, today: NaiveDate) -> Option<ExtractedTxn> {
    // 1. date  description  amount
    if let Some(caps) = date_desc_amount_re().captures(line) {
        let date = to_iso_date(&caps[1], today);
        if let Some(txn) = make_candidate(&caps[3], &caps[2], date) {
            return Some(txn);
        }
    }

    // 2. transaction keyword ... amount; date from the line when present
    if let (Some(kw), Some(amt)) = (keyword_re().find(line), trailing_amount_re().captures(line)) {
        let amt_match = amt.get(1).expect("trailing amount group");
        if kw.end() <= amt_match.start() {
            let description = &line[kw.start()..amt_match.start()];
            let date = to_iso_date(line, today);
            if let Some(txn) = make_candidate(amt_match.as_str(), description, date) {
                return Some(txn);
            }
        }
    }

    // 3. description  date  description  amount
    if let Some(caps) = desc_date_amount_re().captures(line) {
        let date = to_iso_date(&caps[2], today);
        let description = format!("{} {}", &caps[1], &caps[3]);
        if let Some(txn) = make_candidate(&caps[4], &description, date) {
            return Some(txn);
        }
    }

    // 4. two trailing amounts: the last one is the transaction, the other
    //    is a running-balance column
    if let Some(caps) = two_amounts_re().captures(line) {
        let date = to_iso_date(line, today);
        if let Some(txn) = make_candidate(&caps[3], &caps[1], date) {
            return Some(txn);
        }
    }

    None
}

fn decimal_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d),(\d{2})\b").expect("decimal comma regex"))
}

/// Pick the delimiter (`,` vs `;`) yielding more columns on a sample data
/// line. None when neither splits the sample into at least two columns.
/// Commas acting as Brazilian decimal separators are not column
/// boundaries; a free-text line whose only commas sit inside `25,90`-style
/// amounts must stay on the line-pattern path.
fn detect_delimiter(corpus: &str) -> Option<u8> {
    let sample = corpus
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !is_header_line(l))?;
    let masked = decimal_comma_re().replace_all(sample, "${1}${2}");
    let commas = masked.split(',').count();
    let semis = sample.split(';').count();
    if commas < 2 && semis < 2 {
        return None;
    }
    if semis > commas {
        Some(b';')
    } else {
        Some(b',')
    }
}

fn is_header_line(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("data") || lower.contains("date")
}

fn strip_quotes(field: &str) -> String {
    field.trim().trim_matches('"').trim().to_string()
}

/// Assign (date, description, amount) columns by content-sniffing, with
/// positional fallback (0, 1, 2) when sniffing is inconclusive.
fn assign_columns(fields: &[String]) -> Option<(usize, usize, usize)> {
    let date_col = fields.iter().position(|f| date_re().is_match(f));
    let amount_col = fields.iter().enumerate().position(|(i, f)| {
        Some(i) != date_col && amount_token_re().is_match(f.trim())
    });
    let desc_col = fields.iter().enumerate().position(|(i, f)| {
        Some(i) != date_col
            && Some(i) != amount_col
            && f.chars().any(|c| c.is_alphabetic())
    });

    match (date_col, desc_col, amount_col) {
        (Some(d), Some(t), Some(a)) => Some((d, t, a)),
        _ if fields.len() >= 3 => Some((0, 1, 2)),
        _ => None,
    }
}

/// Parse the corpus as delimited rows. Empty result means "not a CSV" and
/// the caller falls through to the line-pattern path.
fn extract_delimited(corpus: &str, today: NaiveDate) -> Vec<ExtractedTxn> {
    let Some(delimiter) = detect_delimiter(corpus) else {
        return Vec::new();
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(corpus.as_bytes());

    let mut txns = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let Ok(record) = result else { continue };
        let fields: Vec<String> = record.iter().map(strip_quotes).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        // Header rows cluster at the top of exports
        if row_idx < 3 && is_header_line(&fields.join(" ")) && !fields.iter().any(|f| date_re().is_match(f)) {
            continue;
        }
        let Some((date_col, desc_col, amount_col)) = assign_columns(&fields) else {
            continue;
        };
        let (Some(date_field), Some(desc_field), Some(amount_field)) = (
            fields.get(date_col),
            fields.get(desc_col),
            fields.get(amount_col),
        ) else {
            continue;
        };
        // Rows without a recognizable date are dropped silently
        if !date_re().is_match(date_field) {
            continue;
        }
        let date = to_iso_date(date_field, today);
        if let Some(txn) = make_candidate(amount_field, desc_field, date) {
            txns.push(txn);
        }
    }
    txns
}

/// Whole-document statement extraction: delimited path first, then the
/// per-line pattern path over the cleaned corpus.
pub fn extract_statement(corpus: &str, today: NaiveDate) -> Vec<ExtractedTxn> {
    let delimited = extract_delimited(corpus, today);
    if !delimited.is_empty() {
        return delimited;
    }
    clean_lines(corpus)
        .iter()
        .filter_map(|line| extract_line(line, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 27).unwrap()
    }

    #[test]
    fn test_date_desc_amount_line() {
        let txn = extract_line("05/06/2024 Supermercado ABC 89,40", today()).unwrap();
        assert_eq!(txn.kind, TxnKind::Expense);
        assert_eq!(txn.amount, 89.40);
        assert!(txn.description.contains("Supermercado ABC"));
        assert_eq!(txn.date, "2024-06-05");
    }

    #[test]
    fn test_keyword_line_without_date_uses_today() {
        let txn = extract_line("PIX ENVIADO MARIA SILVA 150,00", today()).unwrap();
        assert_eq!(txn.kind, TxnKind::Expense);
        assert_eq!(txn.amount, 150.0);
        assert!(txn.description.starts_with("PIX"));
        assert_eq!(txn.date, "2025-08-27");
    }

    #[test]
    fn test_desc_date_desc_amount_line() {
        let txn = extract_line("Fatura cartao 10/01/2024 loja departamento 250,00", today()).unwrap();
        assert_eq!(txn.date, "2024-01-10");
        assert_eq!(txn.amount, 250.0);
        assert!(txn.description.contains("Fatura cartao"));
    }

    #[test]
    fn test_two_trailing_amounts_takes_last() {
        // statement layout with a running-balance column: amount then balance
        let txn = extract_line("TARIFA MENSALIDADE 25,90 1.204,10", today()).unwrap();
        assert_eq!(txn.amount, 1204.10);
    }

    #[test]
    fn test_zero_amount_is_dropped() {
        assert!(extract_line("05/06/2024 Supermercado ABC 0,00", today()).is_none());
    }

    #[test]
    fn test_short_description_is_dropped() {
        assert!(extract_line("05/06/2024 AB 89,40", today()).is_none());
    }

    #[test]
    fn test_classify_explicit_plus_is_income() {
        assert_eq!(classify_kind("+100,00", "COMPRA LOJA"), TxnKind::Income);
    }

    #[test]
    fn test_classify_credit_vocab_is_income() {
        assert_eq!(classify_kind("100,00", "PIX RECEBIDO JOAO"), TxnKind::Income);
        assert_eq!(classify_kind("100,00", "SALARIO EMPRESA XYZ"), TxnKind::Income);
    }

    #[test]
    fn test_classify_minus_beats_credit_vocab() {
        assert_eq!(classify_kind("-100,00", "ESTORNO CREDITO"), TxnKind::Expense);
    }

    #[test]
    fn test_classify_default_is_expense() {
        assert_eq!(classify_kind("100,00", "POSTO SHELL"), TxnKind::Expense);
    }

    #[test]
    fn test_description_truncated_to_cap() {
        let long = format!("05/06/2024 {} 10,00", "X".repeat(300));
        let txn = extract_line(&long, today()).unwrap();
        assert_eq!(txn.description.chars().count(), MAX_DESCRIPTION_LEN);
    }

    #[test]
    fn test_csv_comma_delimited() {
        let corpus = "data,descricao,valor\n05/06/2024,Supermercado ABC,89.40\n06/06/2024,Salario Mensal,+3500.00\n";
        let txns = extract_statement(corpus, today());
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].date, "2024-06-05");
        assert_eq!(txns[0].amount, 89.40);
        assert_eq!(txns[0].kind, TxnKind::Expense);
        assert_eq!(txns[1].kind, TxnKind::Income);
    }

    #[test]
    fn test_csv_semicolon_delimited_brazilian_amounts() {
        let corpus = "Data;Hist\u{f3}rico;Valor\n05/06/2024;PAGAMENTO BOLETO;1.234,56\n";
        let txns = extract_statement(corpus, today());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, 1234.56);
    }

    #[test]
    fn test_csv_sniffs_shuffled_columns() {
        let corpus = "descricao,valor,data\nFarmacia Pague Menos,45.30,05/03/2024\n";
        let txns = extract_statement(corpus, today());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, "2024-03-05");
        assert_eq!(txns[0].amount, 45.30);
        assert!(txns[0].description.contains("Farmacia"));
    }

    #[test]
    fn test_csv_precedence_over_line_patterns() {
        // free-text noise that the line path would happily match must not
        // leak into a document the delimited path already handled
        let corpus = "data,descricao,valor\n05/06/2024,Supermercado ABC,89.40\n\nPIX ENVIADO RUIDO SOLTO 77,00\n";
        let txns = extract_statement(corpus, today());
        assert_eq!(txns.len(), 1);
        assert!(txns[0].description.contains("Supermercado"));
    }

    #[test]
    fn test_decimal_commas_do_not_trigger_delimited_path() {
        // a dated free-text line with an amount and a running-balance
        // column; every comma here is a decimal separator
        let txns = extract_statement("05/06/2024 TARIFA MENSALIDADE 25,90 1.204,10\n", today());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, 1204.10);
        assert!(txns[0].description.contains("TARIFA MENSALIDADE"));
        assert_eq!(txns[0].date, "2024-06-05");
    }

    #[test]
    fn test_csv_rows_without_date_dropped_silently() {
        let corpus = "data,descricao,valor\n05/06/2024,Supermercado ABC,89.40\n,SEM DATA,10.00\n";
        let txns = extract_statement(corpus, today());
        assert_eq!(txns.len(), 1);
    }

    #[test]
    fn test_line_extractor_idempotent_on_cleaned_output() {
        let corpus = "05/06/2024 Supermercado ABC 89,40\nPIX RECEBIDO JOAO 300,00\nruido aleatorio\n";
        let first_pass: Vec<String> = crate::ingest::decode::clean_lines(corpus);
        let extracted: Vec<_> = first_pass
            .iter()
            .filter_map(|l| extract_line(l, today()))
            .collect();
        let second_pass: Vec<String> =
            crate::ingest::decode::clean_lines(&first_pass.join("\n"));
        let re_extracted: Vec<_> = second_pass
            .iter()
            .filter_map(|l| extract_line(l, today()))
            .collect();
        assert_eq!(extracted, re_extracted);
    }
}
