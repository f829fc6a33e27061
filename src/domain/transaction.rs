use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::WalletId;
use super::amount::WalletCurrency;
use super::metadata::LedgerTransactionType;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// One persisted journal line
    LedgerTransactionId
);
string_id!(
    /// One committed entry, grouping its lines
    LedgerJournalId
);
string_id!(
    /// Lightning payment hash
    PaymentHash
);
string_id!(
    /// Bitcoin transaction id
    OnChainTxHash
);
string_id!(
    /// Preimage revealed when a Lightning payment settles
    RevealedPreImage
);

/// Domain view of one liabilities line, as read back from the journal
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerTransaction {
    pub id: LedgerTransactionId,
    pub wallet_id: Option<WalletId>,
    pub tx_type: Option<LedgerTransactionType>,
    pub debit: u64,
    pub credit: u64,
    pub fee: u64,
    pub usd: Option<f64>,
    pub fee_usd: Option<f64>,
    pub currency: WalletCurrency,
    pub timestamp: DateTime<Utc>,
    pub pending_confirmation: bool,
    pub journal_id: LedgerJournalId,
    pub ln_memo: Option<String>,
    pub username: Option<String>,
    pub memo_from_payer: Option<String>,
    pub payment_hash: Option<PaymentHash>,
    pub pubkey: Option<String>,
    pub address: Option<String>,
    pub tx_hash: Option<OnChainTxHash>,
    pub fee_known_in_advance: bool,
    pub revealed_preimage: Option<RevealedPreImage>,
}

/// Result of committing one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerJournal {
    pub journal_id: LedgerJournalId,
    pub voided: bool,
    pub transaction_ids: Vec<LedgerTransactionId>,
}

/// Per-transaction data the book does not store natively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTransactionMetadata {
    pub id: LedgerTransactionId,
    pub details: TransactionMetadataDetails,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionMetadataDetails {
    Ln {
        hash: PaymentHash,
        revealed_preimage: Option<RevealedPreImage>,
    },
    OnChain {
        hash: OnChainTxHash,
    },
    Intraledger,
}

impl LedgerTransactionMetadata {
    pub fn revealed_preimage(&self) -> Option<&RevealedPreImage> {
        match &self.details {
            TransactionMetadataDetails::Ln {
                revealed_preimage, ..
            } => revealed_preimage.as_ref(),
            _ => None,
        }
    }

    pub fn hash(&self) -> Option<&str> {
        match &self.details {
            TransactionMetadataDetails::Ln { hash, .. } => Some(hash.as_str()),
            TransactionMetadataDetails::OnChain { hash } => Some(hash.as_str()),
            TransactionMetadataDetails::Intraledger => None,
        }
    }
}

/// Update applied to every metadata record sharing a hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataUpdate {
    OnChain {
        hash: OnChainTxHash,
    },
    Ln {
        hash: PaymentHash,
        revealed_preimage: Option<RevealedPreImage>,
    },
}

impl MetadataUpdate {
    pub fn hash(&self) -> &str {
        match self {
            Self::OnChain { hash } => hash.as_str(),
            Self::Ln { hash, .. } => hash.as_str(),
        }
    }
}
