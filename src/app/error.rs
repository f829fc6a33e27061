use std::io;
use thiserror::Error;

use crate::domain::DomainError;
use crate::engine::EngineError;
use crate::io::IoError;
use crate::ledger::LedgerError;
use crate::storage::StorageError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV IO error: {0}")]
    CsvIo(#[from] IoError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read config: {0}")]
    Config(String),

    #[error("Cannot initialise logging: {0}")]
    Logging(String),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
