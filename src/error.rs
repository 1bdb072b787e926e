use chrono::NaiveDate;
use thiserror::Error;

use crate::models::CheckKind;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Line {line}: date {current} does not follow {previous}")]
    DateOrder {
        line: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Column {column} has {actual} values, expected {expected}")]
    ColumnLength {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Tally row '{0}' has already been written")]
    TallyRowAlreadyWritten(CheckKind),

    #[error("Tally accounting error for {check} / {column}: {message}")]
    TallyAccounting {
        check: CheckKind,
        column: &'static str,
        message: String,
    },

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
