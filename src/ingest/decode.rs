//! Byte decoding and line cleanup: raw upload bytes in, a filtered corpus
//! of candidate transaction lines out. Lossy and heuristic on purpose —
//! this stage never fails, whatever the input looks like.

use std::sync::OnceLock;

use regex::Regex;

use super::dates::date_re;
use super::FileKind;

/// Lines shorter than this after cleanup carry no useful signal.
const MIN_LINE_LEN: usize = 5;

/// Decode uploaded bytes into text. CSV/plain-text uploads decode lossily
/// as UTF-8. Byte-oriented uploads (PDF, unknown) try strict UTF-8 first,
/// then Windows-1252 (which also covers Latin-1 statements from older bank
/// exports), and finally an infallible byte-to-char projection.
pub fn decode_bytes(bytes: &[u8], kind: FileKind) -> String {
    match kind {
        FileKind::Csv | FileKind::Text => String::from_utf8_lossy(bytes).into_owned(),
        FileKind::Pdf | FileKind::Other => {
            if let Ok(text) = std::str::from_utf8(bytes) {
                return text.to_string();
            }
            let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
            if !had_errors {
                return text.into_owned();
            }
            project_bytes(bytes)
        }
    }
}

/// Last-resort decode: printable ASCII and high bytes map to characters,
/// everything else becomes a space.
fn project_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x20..=0x7e => b as char,
            0xa0..=0xff => b as char,
            b'\n' => '\n',
            _ => ' ',
        })
        .collect()
}

fn ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("ws regex"))
}

fn money_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)R\$\s*\d|[+-]?\d{1,3}(?:\.\d{3})+,\d{2}|\d+[.,]\d{2}")
            .expect("money regex")
    })
}

fn txn_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(PIX|TED|DOC|COMPRA|PAGAMENTO|SAQUE|DEP[ÓO]SITO|TRANSFER[ÊE]NCIA|SAL[ÁA]RIO|D[ÉE]BITO|CR[ÉE]DITO)\b",
        )
        .expect("txn keyword regex")
    })
}

fn merchant_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(SUPERMERCADO|MERCADO|FARM[ÁA]CIA|POSTO|LOJA|PADARIA|RESTAURANTE)\b",
        )
        .expect("merchant keyword regex")
    })
}

fn bank_keyword_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(ITA[ÚU]|BRADESCO|SANTANDER|CAIXA|NUBANK|INTER|SICOOB|SICREDI|BANCO)\b")
            .expect("bank keyword regex")
    })
}

/// PDF structure markers that survive the byte projection as plain text.
fn pdf_noise_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(%PDF|%%EOF|xref|trailer|startxref|endstream|endobj|stream$|\d+ \d+ obj|/[A-Za-z]+)")
            .expect("pdf noise regex")
    })
}

/// Strip control and other non-printable characters, keeping printable
/// ASCII and the Latin ranges accented pt-BR text lives in.
fn sanitize_line(line: &str) -> String {
    let kept: String = line
        .chars()
        .map(|c| match c {
            ' '..='~' => c,
            '\u{a0}'..='\u{17f}' => c,
            _ => ' ',
        })
        .collect();
    ws_re().replace_all(kept.trim(), " ").to_string()
}

/// Whether a cleaned line plausibly describes a transaction: a date, a
/// monetary token, or known transaction/merchant/institution vocabulary.
pub fn looks_transactional(line: &str) -> bool {
    date_re().is_match(line)
        || money_re().is_match(line)
        || txn_keyword_re().is_match(line)
        || merchant_keyword_re().is_match(line)
        || bank_keyword_re().is_match(line)
}

/// Split decoded text into sanitized lines, dropping only the obviously
/// unusable: too-short lines and PDF structure noise. The receipt scanner
/// works at this level because merchant names carry no transaction signal.
pub fn sanitize_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(sanitize_line)
        .filter(|line| line.len() >= MIN_LINE_LEN)
        .filter(|line| !pdf_noise_re().is_match(line))
        .collect()
}

/// Sanitized lines narrowed to those with a transaction signal. Lossy
/// filter: false positives and negatives are both acceptable here.
pub fn clean_lines(text: &str) -> Vec<String> {
    sanitize_lines(text)
        .into_iter()
        .filter(|line| looks_transactional(line))
        .collect()
}
