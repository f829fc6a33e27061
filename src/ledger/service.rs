use std::collections::HashSet;
use std::sync::Arc;

use futures::future::{self, join_all};
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use tracing::{debug, error};

use super::anomaly::{Anomaly, AnomalyReporter};
use super::error::LedgerError;
use super::translate::to_ledger_transaction;
use crate::domain::{
    JournalEntry, LIABILITIES_MAIN_ACCOUNT, LedgerAccountId, LedgerJournal, LedgerTransaction,
    LedgerTransactionId, LedgerTransactionMetadata, LedgerTransactionType, MetadataUpdate,
    OnChainTxHash, PaymentHash, StaticAccountIds, WalletId,
};
use crate::storage::{Book, JournalQuery, JournalRecord, TransactionsMetadataRepository};

/// Read side of the ledger: journal lines joined with their metadata and
/// translated into [`LedgerTransaction`] views
pub struct LedgerService<B, R, A>
where
    B: Book,
    R: TransactionsMetadataRepository,
    A: AnomalyReporter,
{
    book: Arc<B>,
    metadata: Arc<R>,
    reporter: A,
    accounts: StaticAccountIds,
}

impl<B, R, A> LedgerService<B, R, A>
where
    B: Book,
    R: TransactionsMetadataRepository,
    A: AnomalyReporter,
{
    pub fn new(book: Arc<B>, metadata: Arc<R>, reporter: A, accounts: StaticAccountIds) -> Self {
        Self {
            book,
            metadata,
            reporter,
            accounts,
        }
    }

    /// Commit a built entry through the book
    pub async fn record(&self, entry: JournalEntry) -> Result<LedgerJournal, LedgerError> {
        let description = entry.description().to_string();
        let journal = self.book.commit(entry).await?;
        debug!(journal_id = %journal.journal_id, description = %description, "Recorded entry");
        Ok(journal)
    }

    pub async fn update_metadata_by_hash(&self, update: &MetadataUpdate) -> Result<(), LedgerError> {
        self.metadata.update_by_hash(update).await?;
        Ok(())
    }

    /// The single liabilities line with this id
    pub async fn get_transaction_by_id(
        &self,
        id: &LedgerTransactionId,
    ) -> Result<LedgerTransaction, LedgerError> {
        let query = JournalQuery::new().under(LIABILITIES_MAIN_ACCOUNT).id(id);
        let records = self.book.ledger(&query).await?;
        if records.len() != 1 {
            return Err(LedgerError::CouldNotFindTransaction);
        }

        let mut transactions = self.translate(records).await;
        transactions.pop().ok_or(LedgerError::CouldNotFindTransaction)
    }

    pub async fn get_transactions_by_hash(
        &self,
        hash: &str,
    ) -> Result<Vec<LedgerTransaction>, LedgerError> {
        let query = JournalQuery::new().under(LIABILITIES_MAIN_ACCOUNT).hash(hash);
        self.fetch(&query).await
    }

    pub async fn get_transactions_by_wallet_id(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Vec<LedgerTransaction>, LedgerError> {
        let query = JournalQuery::new().account(&LedgerAccountId::for_wallet(wallet_id));
        self.fetch(&query).await
    }

    pub async fn get_transactions_by_wallet_id_and_contact_username(
        &self,
        wallet_id: &WalletId,
        contact_username: &str,
    ) -> Result<Vec<LedgerTransaction>, LedgerError> {
        let query = JournalQuery::new()
            .account(&LedgerAccountId::for_wallet(wallet_id))
            .username(contact_username);
        self.fetch(&query).await
    }

    pub async fn list_pending_payments(
        &self,
        wallet_id: &WalletId,
    ) -> Result<Vec<LedgerTransaction>, LedgerError> {
        self.fetch(&pending_payments(wallet_id)).await
    }

    pub async fn get_pending_payments_count(&self, wallet_id: &WalletId) -> Result<u64, LedgerError> {
        Ok(self.book.count(&pending_payments(wallet_id)).await?)
    }

    /// Signed balance of the wallet's liabilities account.
    ///
    /// A negative balance is still returned, and reported as a critical anomaly.
    pub async fn get_wallet_balance(&self, wallet_id: &WalletId) -> Result<i64, LedgerError> {
        let query = JournalQuery::new().account(&LedgerAccountId::for_wallet(wallet_id));
        let balance = self.book.balance(&query).await?;
        if balance < 0 {
            self.reporter.report(Anomaly::NegativeBalance {
                wallet_id: wallet_id.clone(),
                balance,
            });
        }
        Ok(balance)
    }

    pub async fn is_on_chain_tx_recorded(
        &self,
        wallet_id: &WalletId,
        tx_hash: &OnChainTxHash,
    ) -> Result<bool, LedgerError> {
        let query = JournalQuery::new()
            .account(&LedgerAccountId::for_wallet(wallet_id))
            .tx_type(LedgerTransactionType::OnchainReceipt)
            .hash(tx_hash.as_str());
        Ok(self.book.count(&query).await? > 0)
    }

    /// True once a settled line carries this payment hash
    pub async fn is_ln_tx_recorded(&self, payment_hash: &PaymentHash) -> Result<bool, LedgerError> {
        let query = JournalQuery::new()
            .pending(false)
            .hash(payment_hash.as_str());
        Ok(self.book.count(&query).await? > 0)
    }

    /// Wallet of the first liabilities line with this hash that is not the bank owner's
    pub async fn get_wallet_id_by_transaction_hash(
        &self,
        hash: &str,
    ) -> Result<WalletId, LedgerError> {
        let query = JournalQuery::new()
            .under(LIABILITIES_MAIN_ACCOUNT)
            .excluding(&self.accounts.bank_owner)
            .hash(hash);
        let record = self
            .book
            .stream(query)
            .try_next()
            .await?
            .ok_or(LedgerError::CouldNotFindTransaction)?;

        record
            .account
            .wallet_id()
            .ok_or_else(|| LedgerError::unknown("no wallet id associated to transaction"))
    }

    /// Distinct hashes of payment lines, newest first
    pub fn list_all_payment_hashes(&self) -> BoxStream<'_, Result<PaymentHash, LedgerError>> {
        let mut seen = HashSet::new();
        self.book
            .stream(JournalQuery::new().tx_type(LedgerTransactionType::Payment))
            .map_err(LedgerError::from)
            .try_filter_map(move |record| {
                let hash = record
                    .metadata
                    .hash()
                    .map(PaymentHash::new)
                    .filter(|hash| seen.insert(hash.clone()));
                future::ready(Ok(hash))
            })
            .boxed()
    }

    /// Distinct wallets holding at least one pending payment line
    pub fn list_wallet_ids_with_pending_payments(
        &self,
    ) -> BoxStream<'_, Result<WalletId, LedgerError>> {
        let query = JournalQuery::new()
            .tx_type(LedgerTransactionType::Payment)
            .pending(true)
            .under(LIABILITIES_MAIN_ACCOUNT);
        let mut seen = HashSet::new();
        self.book
            .stream(query)
            .map_err(LedgerError::from)
            .try_filter_map(move |record| {
                let wallet_id = record
                    .account
                    .wallet_id()
                    .filter(|wallet_id| seen.insert(wallet_id.clone()));
                future::ready(Ok(wallet_id))
            })
            .boxed()
    }

    async fn fetch(&self, query: &JournalQuery) -> Result<Vec<LedgerTransaction>, LedgerError> {
        let records = self.book.ledger(query).await?;
        debug!(results = records.len(), "Fetched journal lines");
        Ok(self.translate(records).await)
    }

    async fn translate(&self, records: Vec<JournalRecord>) -> Vec<LedgerTransaction> {
        let lookups = records.iter().map(|record| self.find_metadata(&record.id));
        let metadata = join_all(lookups).await;

        records
            .into_iter()
            .zip(metadata)
            .map(|(record, metadata)| to_ledger_transaction(record, metadata.as_ref()))
            .collect()
    }

    async fn find_metadata(&self, id: &LedgerTransactionId) -> Option<LedgerTransactionMetadata> {
        match self.metadata.find_by_id(id).await {
            Ok(metadata) => Some(metadata),
            Err(e) if e.is_not_found() => {
                debug!(transaction_id = %id, "No metadata stored for transaction");
                None
            }
            Err(e) => {
                error!(
                    transaction_id = %id,
                    error = %e,
                    "Could not fetch transaction metadata"
                );
                None
            }
        }
    }
}

fn pending_payments(wallet_id: &WalletId) -> JournalQuery {
    JournalQuery::new()
        .account(&LedgerAccountId::for_wallet(wallet_id))
        .tx_type(LedgerTransactionType::Payment)
        .pending(true)
}
