use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::amount::{Btc, Currency, WalletCurrency};

/// Root of the customer-owned sub-ledger
pub const LIABILITIES_MAIN_ACCOUNT: &str = "Liabilities";

/// Hot wallet held on the Lightning node
pub const LND_LEDGER_ACCOUNT_ID: &str = "Assets:Reserve:Lightning";

/// On-chain cold storage reserve
pub const COLD_STORAGE_ACCOUNT_ID: &str = "Assets:Reserve:Bitcoin";

const PATH_SEPARATOR: char = ':';

/// Identifier of a ledger account, written as a `:`-separated path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerAccountId(String);

impl LedgerAccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Liabilities account backing a customer wallet
    pub fn for_wallet(wallet_id: &WalletId) -> Self {
        Self(format!(
            "{LIABILITIES_MAIN_ACCOUNT}{PATH_SEPARATOR}{}",
            wallet_id.as_str()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, root first
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(PATH_SEPARATOR)
    }

    /// True when this account is `prefix` itself or nested below it
    pub fn is_under(&self, prefix: &str) -> bool {
        self.0 == prefix
            || self
                .0
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
    }

    /// Wallet owning this account, if it is a direct liabilities child
    pub fn wallet_id(&self) -> Option<WalletId> {
        let rest = self
            .0
            .strip_prefix(LIABILITIES_MAIN_ACCOUNT)?
            .strip_prefix(PATH_SEPARATOR)?;
        if rest.is_empty() || rest.contains(PATH_SEPARATOR) {
            return None;
        }
        Some(WalletId::new(rest))
    }
}

impl fmt::Display for LedgerAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LedgerAccountId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Customer wallet identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(String);

impl WalletId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An account together with its fixed native currency
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountDescriptor<C: Currency> {
    id: LedgerAccountId,
    _currency: PhantomData<C>,
}

impl<C: Currency> AccountDescriptor<C> {
    pub fn new(id: LedgerAccountId) -> Self {
        Self {
            id,
            _currency: PhantomData,
        }
    }

    pub fn for_wallet(wallet_id: &WalletId) -> Self {
        Self::new(LedgerAccountId::for_wallet(wallet_id))
    }

    pub fn id(&self) -> &LedgerAccountId {
        &self.id
    }

    pub fn currency(&self) -> WalletCurrency {
        C::WALLET_CURRENCY
    }
}

/// Well-known accounts every builder run may touch.
///
/// Supplied by configuration; the builder only reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StaticAccountIds {
    pub bank_owner: LedgerAccountId,
    pub dealer_btc: LedgerAccountId,
    pub dealer_usd: LedgerAccountId,
    pub lnd: LedgerAccountId,
    pub cold_storage: LedgerAccountId,
}

impl StaticAccountIds {
    pub fn lnd_descriptor(&self) -> AccountDescriptor<Btc> {
        AccountDescriptor::new(self.lnd.clone())
    }

    pub fn cold_storage_descriptor(&self) -> AccountDescriptor<Btc> {
        AccountDescriptor::new(self.cold_storage.clone())
    }
}

impl Default for StaticAccountIds {
    fn default() -> Self {
        Self {
            bank_owner: LedgerAccountId::for_wallet(&WalletId::new("bank-owner")),
            dealer_btc: LedgerAccountId::for_wallet(&WalletId::new("dealer-btc")),
            dealer_usd: LedgerAccountId::for_wallet(&WalletId::new("dealer-usd")),
            lnd: LedgerAccountId::new(LND_LEDGER_ACCOUNT_ID),
            cold_storage: LedgerAccountId::new(COLD_STORAGE_ACCOUNT_ID),
        }
    }
}
