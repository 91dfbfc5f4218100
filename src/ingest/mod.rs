//! Document-ingestion pipeline: uploaded file bytes plus a document class
//! in, normalized transaction candidates out. Every stage is best-effort;
//! the pipeline as a whole never fails and never returns an empty list —
//! zero-yield extraction substitutes a fixed demo set, explicitly flagged.

pub mod amount;
pub mod dates;
pub mod decode;
pub mod receipt;
pub mod statement;

use std::path::Path;

use chrono::{Duration, NaiveDate};

use crate::error::{BolsoError, Result};
use crate::models::{ExtractedTxn, TxnKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// A purchase receipt: at most one transaction, the total.
    Receipt,
    /// A bank statement: one transaction per recognizable line/row.
    Statement,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Statement => "statement",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "receipt" => Ok(Self::Receipt),
            "statement" => Ok(Self::Statement),
            _ => Err(BolsoError::UnknownDocumentKind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Text,
    Pdf,
    Other,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("csv") => Self::Csv,
            Some("txt") => Self::Text,
            Some("pdf") => Self::Pdf,
            _ => Self::Other,
        }
    }
}

/// Pipeline result. `fallback` marks demo data substituted for a
/// zero-yield extraction; callers must surface the distinction and never
/// present fallback rows as real data.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub transactions: Vec<ExtractedTxn>,
    pub message: String,
    pub fallback: bool,
}

struct SampleTxn {
    days_ago: i64,
    description: &'static str,
    amount: f64,
    kind: TxnKind,
}

/// Fixed demo set returned when extraction yields nothing, so the caller
/// always has something to show.
const SAMPLES: &[SampleTxn] = &[
    SampleTxn { days_ago: 1, description: "SUPERMERCADO PAO DE ACUCAR", amount: 187.45, kind: TxnKind::Expense },
    SampleTxn { days_ago: 2, description: "POSTO IPIRANGA", amount: 150.00, kind: TxnKind::Expense },
    SampleTxn { days_ago: 4, description: "PIX RECEBIDO MARIA SILVA", amount: 350.00, kind: TxnKind::Income },
    SampleTxn { days_ago: 6, description: "FARMACIA DROGASIL", amount: 64.30, kind: TxnKind::Expense },
    SampleTxn { days_ago: 9, description: "RESTAURANTE SABOR CASEIRO", amount: 52.90, kind: TxnKind::Expense },
    SampleTxn { days_ago: 12, description: "SALARIO MENSAL", amount: 4200.00, kind: TxnKind::Income },
];

fn fallback_transactions(today: NaiveDate) -> Vec<ExtractedTxn> {
    SAMPLES
        .iter()
        .map(|s| ExtractedTxn {
            kind: s.kind,
            amount: s.amount,
            description: s.description.to_string(),
            date: (today - Duration::days(s.days_ago))
                .format("%Y-%m-%d")
                .to_string(),
        })
        .collect()
}

/// Pipeline entry point: decode, dispatch on document class, fall back to
/// demo data when nothing was extracted.
pub fn process_document(
    bytes: &[u8],
    document: DocumentKind,
    file: FileKind,
    today: NaiveDate,
) -> IngestOutcome {
    let corpus = decode::decode_bytes(bytes, file);
    let transactions = match document {
        DocumentKind::Statement => statement::extract_statement(&corpus, today),
        DocumentKind::Receipt => receipt::extract_receipt(&corpus, today)
            .into_iter()
            .collect(),
    };

    if transactions.is_empty() {
        IngestOutcome {
            transactions: fallback_transactions(today),
            message: "No transactions could be extracted from the document; \
                      sample data was generated instead."
                .to_string(),
            fallback: true,
        }
    } else {
        IngestOutcome {
            message: format!(
                "Extracted {} transaction(s) from the document.",
                transactions.len()
            ),
            transactions,
            fallback: false,
        }
    }
}
