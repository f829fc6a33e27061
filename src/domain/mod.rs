pub mod account;
pub mod amount;
pub mod entry;
pub mod error;
pub mod metadata;
pub mod metadata_factory;
pub mod transaction;
pub mod transfer;

// Re-export commonly used types
pub use account::{
    AccountDescriptor, COLD_STORAGE_ACCOUNT_ID, LIABILITIES_MAIN_ACCOUNT, LND_LEDGER_ACCOUNT_ID,
    LedgerAccountId, StaticAccountIds, WalletId,
};
pub use amount::{
    Btc, BtcPaymentAmount, Currency, PaymentAmount, PrincipalAmount, Usd, UsdPaymentAmount,
    WalletAmount, WalletCurrency, ZERO_CENTS, ZERO_SATS,
};
pub use entry::{CurrencyTotals, Entry, EntryLine, JournalEntry, Side};
pub use error::DomainError;
pub use metadata::{
    CURRENCY_KEY, HASH_KEY, LedgerTransactionType, PENDING_KEY, TYPE_KEY, TxMetadata, USERNAME_KEY,
};
pub use metadata_factory::IntraledgerMetadata;
pub use transaction::{
    LedgerJournal, LedgerJournalId, LedgerTransaction, LedgerTransactionId,
    LedgerTransactionMetadata, MetadataUpdate, OnChainTxHash, PaymentHash, RevealedPreImage,
    TransactionMetadataDetails,
};
pub use transfer::{Transfer, WalletLeg};
