use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tracing::debug;
use uuid::Uuid;

use super::error::StorageError;
use super::query::{AccountBalance, JournalQuery, JournalRecord};
use super::traits::Book;
use crate::domain::{
    DomainError, JournalEntry, LedgerAccountId, LedgerJournal, LedgerJournalId,
    LedgerTransactionId, Side, WalletCurrency,
};

/// Concurrent in-memory book using DashMap, one map entry per journal.
///
/// Every account is pinned to the currency of its first committed line.
pub struct InMemoryBook {
    journals: DashMap<LedgerJournalId, Vec<JournalRecord>>,
    currencies: DashMap<LedgerAccountId, WalletCurrency>,
    sequence: AtomicU64,
}

impl InMemoryBook {
    pub fn new() -> Self {
        Self {
            journals: DashMap::new(),
            currencies: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Lines committed under `journal_id`, in entry order
    pub fn journal(&self, journal_id: &LedgerJournalId) -> Option<Vec<JournalRecord>> {
        self.journals.get(journal_id).map(|r| r.value().clone())
    }

    pub fn journal_count(&self) -> usize {
        self.journals.len()
    }

    fn matching(&self, query: &JournalQuery) -> Vec<JournalRecord> {
        // DashMap holds brief per-shard locks during iteration
        let mut records: Vec<JournalRecord> = self
            .journals
            .iter()
            .flat_map(|journal| {
                journal
                    .value()
                    .iter()
                    .filter(|record| query.matches(record))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();
        records.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        records
    }

    /// Reject lines whose currency differs from the account's, then pin new accounts
    fn pin_currencies(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        let mut staged: BTreeMap<&LedgerAccountId, WalletCurrency> = BTreeMap::new();
        for line in entry.lines() {
            let found = line.amount.currency;
            let pinned = self
                .currencies
                .get(&line.account_id)
                .map(|currency| *currency.value())
                .or_else(|| staged.get(&line.account_id).copied());
            match pinned {
                Some(pinned) if pinned != found => {
                    return Err(StorageError::CurrencyMismatch {
                        account: line.account_id.clone(),
                        pinned,
                        found,
                    });
                }
                Some(_) => {}
                None => {
                    staged.insert(&line.account_id, found);
                }
            }
        }

        for (account, currency) in staged {
            self.currencies.entry(account.clone()).or_insert(currency);
        }
        Ok(())
    }
}

impl Default for InMemoryBook {
    fn default() -> Self {
        Self::new()
    }
}

fn narrow(total: i128) -> Result<i64, StorageError> {
    i64::try_from(total).map_err(|_| StorageError::Domain(DomainError::Overflow))
}

#[async_trait]
impl Book for InMemoryBook {
    async fn commit(&self, entry: JournalEntry) -> Result<LedgerJournal, StorageError> {
        if entry.is_empty() {
            return Err(StorageError::EmptyEntry);
        }
        if let Some((currency, _)) = entry
            .totals()
            .into_iter()
            .find(|(_, totals)| !totals.is_balanced())
        {
            return Err(StorageError::Unbalanced(currency));
        }
        self.pin_currencies(&entry)?;

        let journal_id = LedgerJournalId::new(Uuid::new_v4().to_string());
        let timestamp = Utc::now();
        let memo = entry.description().to_string();

        let records: Vec<JournalRecord> = entry
            .into_lines()
            .into_iter()
            .map(|line| {
                let (debit, credit) = match line.side {
                    Side::Debit => (line.amount.amount, 0),
                    Side::Credit => (0, line.amount.amount),
                };
                JournalRecord {
                    id: LedgerTransactionId::new(Uuid::new_v4().to_string()),
                    journal_id: journal_id.clone(),
                    account: line.account_id,
                    debit,
                    credit,
                    currency: line.amount.currency,
                    timestamp,
                    metadata: line.metadata,
                    memo: memo.clone(),
                    voided: false,
                    sequence: self.sequence.fetch_add(1, Ordering::Relaxed),
                }
            })
            .collect();

        let transaction_ids = records.iter().map(|record| record.id.clone()).collect();
        debug!(journal_id = %journal_id, lines = records.len(), "Committed journal");
        self.journals.insert(journal_id.clone(), records);

        Ok(LedgerJournal {
            journal_id,
            voided: false,
            transaction_ids,
        })
    }

    async fn ledger(&self, query: &JournalQuery) -> Result<Vec<JournalRecord>, StorageError> {
        Ok(self.matching(query))
    }

    async fn balance(&self, query: &JournalQuery) -> Result<i64, StorageError> {
        let total: i128 = self
            .matching(query)
            .iter()
            .map(JournalRecord::signed_amount)
            .sum();
        narrow(total)
    }

    async fn count(&self, query: &JournalQuery) -> Result<u64, StorageError> {
        Ok(self.matching(query).len() as u64)
    }

    /// Matching lines are collected up front, so the stream holds a snapshot
    /// taken at the call rather than a live cursor
    fn stream(&self, query: JournalQuery) -> BoxStream<'_, Result<JournalRecord, StorageError>> {
        let records = self.matching(&query);
        stream::iter(records.into_iter().map(Ok)).boxed()
    }

    async fn balances(&self) -> Result<Vec<AccountBalance>, StorageError> {
        let mut totals: BTreeMap<(LedgerAccountId, WalletCurrency), i128> = BTreeMap::new();
        for journal in self.journals.iter() {
            for record in journal.value() {
                *totals
                    .entry((record.account.clone(), record.currency))
                    .or_default() += record.signed_amount();
            }
        }

        totals
            .into_iter()
            .map(|((account, currency), total)| {
                Ok(AccountBalance {
                    account,
                    currency,
                    balance: narrow(total)?,
                })
            })
            .collect()
    }
}
