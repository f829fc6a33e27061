use std::io;
use thiserror::Error;

use crate::domain::DomainError;

/// IO-level errors for CSV parsing and stream processing
#[derive(Error, Debug)]
pub enum IoError {
    #[error("CSV async parsing error: {0}")]
    CsvAsync(#[from] csv_async::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid transfer kind: {0}")]
    InvalidTransferKind(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid amount format: {0}")]
    InvalidAmount(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}
