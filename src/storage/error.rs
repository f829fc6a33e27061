use std::error::Error;

use thiserror::Error;

use crate::domain::{DomainError, LedgerAccountId, WalletCurrency};

/// Storage-level errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Entity not found")]
    NotFound,

    #[error("Entry has no lines")]
    EmptyEntry,

    #[error("Entry does not balance in {0}")]
    Unbalanced(WalletCurrency),

    #[error("Account {account} holds {pinned}, not {found}")]
    CurrencyMismatch {
        account: LedgerAccountId,
        pinned: WalletCurrency,
        found: WalletCurrency,
    },

    #[error("Storage failure: {0}")]
    Unknown(#[source] Box<dyn Error + Send + Sync>),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl StorageError {
    /// Wrap an opaque backend failure
    pub fn unknown(error: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Unknown(error.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
