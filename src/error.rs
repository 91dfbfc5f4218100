use thiserror::Error;

#[derive(Error, Debug)]
pub enum BolsoError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Unknown document type: {0} (expected 'receipt' or 'statement')")]
    UnknownDocumentKind(String),

    #[error("Unknown account type: {0}")]
    UnknownAccountKind(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BolsoError>;
