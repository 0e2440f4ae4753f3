use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a whole request.
#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Failed to load product reference {path:?}: {source}")]
    ReferenceUnavailable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Product reference {path:?} is missing column {column}")]
    ReferenceColumnMissing { path: PathBuf, column: &'static str },

    #[error("Failed to list transaction files in {path:?}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),

    #[error("Total amount for {key:?} overflowed")]
    AmountOverflow { key: String },
}

/// Failures raised while scanning a transaction file.
///
/// `Row` skips the offending row and `AmountOverflow` fails the request;
/// every other variant drops the file's contribution.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Missing column {0}")]
    MissingColumn(&'static str),

    #[error("Total amount for {key:?} overflowed")]
    AmountOverflow { key: String },

    #[error(transparent)]
    Row(#[from] RowError),
}

/// Failures confined to a single row of a transaction file.
#[derive(Error, Debug)]
pub enum RowError {
    #[error("Malformed record: {0}")]
    Malformed(#[from] csv::Error),

    #[error("Invalid amount {value:?}: {source}")]
    InvalidAmount {
        value: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("Invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
