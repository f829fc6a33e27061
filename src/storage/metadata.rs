use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::error::StorageError;
use super::traits::TransactionsMetadataRepository;
use crate::domain::{
    LedgerTransactionId, LedgerTransactionMetadata, MetadataUpdate, TransactionMetadataDetails,
};

/// Concurrent in-memory metadata store keyed by transaction id
pub struct InMemoryMetadataRepository {
    records: DashMap<LedgerTransactionId, LedgerTransactionMetadata>,
}

impl InMemoryMetadataRepository {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for InMemoryMetadataRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(update: &MetadataUpdate, details: &mut TransactionMetadataDetails) {
    match (update, details) {
        (
            MetadataUpdate::Ln {
                revealed_preimage: Some(preimage),
                ..
            },
            TransactionMetadataDetails::Ln {
                revealed_preimage, ..
            },
        ) => *revealed_preimage = Some(preimage.clone()),
        // Only the hash itself is carried by the other updates, and it already matches
        _ => {}
    }
}

#[async_trait]
impl TransactionsMetadataRepository for InMemoryMetadataRepository {
    async fn find_by_id(
        &self,
        id: &LedgerTransactionId,
    ) -> Result<LedgerTransactionMetadata, StorageError> {
        self.records
            .get(id)
            .map(|r| r.value().clone())
            .ok_or(StorageError::NotFound)
    }

    async fn update_by_hash(&self, update: &MetadataUpdate) -> Result<(), StorageError> {
        let mut updated = 0usize;
        for mut record in self.records.iter_mut() {
            if record.value().hash() == Some(update.hash()) {
                apply(update, &mut record.value_mut().details);
                updated += 1;
            }
        }
        debug!(hash = update.hash(), updated, "Updated transaction metadata");
        Ok(())
    }

    async fn persist_all(
        &self,
        records: Vec<LedgerTransactionMetadata>,
    ) -> Result<Vec<LedgerTransactionMetadata>, StorageError> {
        for record in &records {
            self.records.insert(record.id.clone(), record.clone());
        }
        Ok(records)
    }
}
