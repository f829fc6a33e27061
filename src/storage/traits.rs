use async_trait::async_trait;
use futures::stream::BoxStream;

use super::error::StorageError;
use super::query::{AccountBalance, JournalQuery, JournalRecord};
use crate::domain::{JournalEntry, LedgerJournal, LedgerTransactionId, LedgerTransactionMetadata, MetadataUpdate};

/// Double-entry book persisting committed entries as journal lines
#[async_trait]
pub trait Book: Send + Sync {
    /// Append every line of `entry` as one journal, all or nothing
    async fn commit(&self, entry: JournalEntry) -> Result<LedgerJournal, StorageError>;

    /// Matching lines, newest first
    async fn ledger(&self, query: &JournalQuery) -> Result<Vec<JournalRecord>, StorageError>;

    /// Sum of credit minus debit over matching lines
    async fn balance(&self, query: &JournalQuery) -> Result<i64, StorageError>;

    async fn count(&self, query: &JournalQuery) -> Result<u64, StorageError>;

    /// Forward-only pass over matching lines, newest first
    fn stream(&self, query: JournalQuery) -> BoxStream<'_, Result<JournalRecord, StorageError>>;

    /// Balance of every account and currency touched so far
    async fn balances(&self) -> Result<Vec<AccountBalance>, StorageError>;
}

/// Per-transaction data kept outside the book
#[async_trait]
pub trait TransactionsMetadataRepository: Send + Sync {
    /// Fails with [`StorageError::NotFound`] when nothing was persisted for `id`
    async fn find_by_id(
        &self,
        id: &LedgerTransactionId,
    ) -> Result<LedgerTransactionMetadata, StorageError>;

    /// Apply `update` to every record carrying its hash
    async fn update_by_hash(&self, update: &MetadataUpdate) -> Result<(), StorageError>;

    async fn persist_all(
        &self,
        records: Vec<LedgerTransactionMetadata>,
    ) -> Result<Vec<LedgerTransactionMetadata>, StorageError>;
}
