use std::error::Error;

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by ledger queries
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Could not find transaction")]
    CouldNotFindTransaction,

    #[error("Unknown ledger error: {0}")]
    Unknown(#[source] Box<dyn Error + Send + Sync>),
}

impl LedgerError {
    pub fn unknown(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Unknown(error.into())
    }
}

impl From<StorageError> for LedgerError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::CouldNotFindTransaction,
            other => Self::unknown(other),
        }
    }
}
