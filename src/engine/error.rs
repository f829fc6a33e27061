use thiserror::Error;

use crate::domain::DomainError;
use crate::storage::StorageError;

/// Engine-level errors for recording transfers
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
