use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    LedgerAccountId, LedgerJournalId, LedgerTransactionId, LedgerTransactionType, TxMetadata,
    USERNAME_KEY, WalletCurrency,
};

/// One persisted journal line as the book stores it
#[derive(Debug, Clone, PartialEq)]
pub struct JournalRecord {
    pub id: LedgerTransactionId,
    pub journal_id: LedgerJournalId,
    pub account: LedgerAccountId,
    pub debit: u64,
    pub credit: u64,
    pub currency: WalletCurrency,
    pub timestamp: DateTime<Utc>,
    pub metadata: TxMetadata,
    /// Description of the entry the line was committed with
    pub memo: String,
    pub voided: bool,
    /// Commit order across the whole book, used to sort newest first
    pub sequence: u64,
}

impl JournalRecord {
    /// Credit minus debit, the balance contribution of a liabilities line
    pub fn signed_amount(&self) -> i128 {
        i128::from(self.credit) - i128::from(self.debit)
    }
}

/// Filter over journal lines; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalQuery {
    pub id: Option<LedgerTransactionId>,
    pub account: Option<LedgerAccountId>,
    pub account_path: Option<String>,
    pub exclude_account: Option<LedgerAccountId>,
    pub hash: Option<String>,
    pub tx_type: Option<LedgerTransactionType>,
    pub pending: Option<bool>,
    pub username: Option<String>,
}

impl JournalQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: &LedgerTransactionId) -> Self {
        self.id = Some(id.clone());
        self
    }

    pub fn account(mut self, account: &LedgerAccountId) -> Self {
        self.account = Some(account.clone());
        self
    }

    /// Lines on `path` or any account nested below it
    pub fn under(mut self, path: impl Into<String>) -> Self {
        self.account_path = Some(path.into());
        self
    }

    pub fn excluding(mut self, account: &LedgerAccountId) -> Self {
        self.exclude_account = Some(account.clone());
        self
    }

    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn tx_type(mut self, tx_type: LedgerTransactionType) -> Self {
        self.tx_type = Some(tx_type);
        self
    }

    pub fn pending(mut self, pending: bool) -> Self {
        self.pending = Some(pending);
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn matches(&self, record: &JournalRecord) -> bool {
        if self.id.as_ref().is_some_and(|id| id != &record.id) {
            return false;
        }
        if self
            .account
            .as_ref()
            .is_some_and(|account| account != &record.account)
        {
            return false;
        }
        if self
            .account_path
            .as_deref()
            .is_some_and(|path| !record.account.is_under(path))
        {
            return false;
        }
        if self
            .exclude_account
            .as_ref()
            .is_some_and(|account| account == &record.account)
        {
            return false;
        }
        if self
            .hash
            .as_deref()
            .is_some_and(|hash| record.metadata.hash() != Some(hash))
        {
            return false;
        }
        if self
            .tx_type
            .is_some_and(|tx_type| record.metadata.tx_type() != Some(tx_type))
        {
            return false;
        }
        // Lines written without a pending flag count as settled
        if self
            .pending
            .is_some_and(|pending| record.metadata.pending().unwrap_or(false) != pending)
        {
            return false;
        }
        if self
            .username
            .as_deref()
            .is_some_and(|username| record.metadata.get_str(USERNAME_KEY) != Some(username))
        {
            return false;
        }
        true
    }
}

/// Signed balance of one account in one currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountBalance {
    pub account: LedgerAccountId,
    pub currency: WalletCurrency,
    pub balance: i64,
}
