use thiserror::Error;

use super::amount::WalletCurrency;

/// Domain-level errors raised while constructing ledger entries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount must not be negative: {0}")]
    NegativeAmount(i64),

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Fee of {fee} sats exceeds principal of {principal} sats")]
    FeeExceedsAmount { fee: u64, principal: u64 },

    #[error("A non-zero fee needs a BTC leg, but {debit} -> {credit} has none")]
    FeeRequiresBtcLeg {
        debit: WalletCurrency,
        credit: WalletCurrency,
    },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
}
