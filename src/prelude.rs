//! Prelude module for convenient imports
//!
//! Import everything you need with: `use ledger::prelude::*;`

// Domain types
pub use crate::domain::{
    AccountDescriptor, Btc, BtcPaymentAmount, DomainError, Entry, JournalEntry, LedgerAccountId,
    LedgerJournal, LedgerJournalId, LedgerTransaction, LedgerTransactionId, PaymentHash,
    PrincipalAmount, StaticAccountIds, Transfer, TxMetadata, Usd, UsdPaymentAmount,
    WalletCurrency, WalletId, WalletLeg,
};

// Storage types
pub use crate::storage::{
    AccountBalance, Book, InMemoryBook, InMemoryMetadataRepository, JournalQuery, StorageError,
    TransactionsMetadataRepository,
};

// Engine types
pub use crate::engine::{EngineError, EntryBuilder, TransferProcessor};

// Ledger types
pub use crate::ledger::{
    Anomaly, AnomalyReporter, LedgerError, LedgerService, TracingAnomalyReporter,
};

// IO types
pub use crate::io::{CsvTransferStream, IoError, RawTransferRecord, write_balances};

// Streaming types
pub use crate::streaming::{
    AbortOnError, ErrorPolicy, ProcessingSession, SessionSummary, SilentSkip, SkipErrors,
};

// App types
pub use crate::app::{AppError, CliApp, LedgerConfig, init_tracing, replay};
