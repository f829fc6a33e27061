use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::amount::WalletCurrency;

pub const TYPE_KEY: &str = "type";
pub const PENDING_KEY: &str = "pending";
pub const HASH_KEY: &str = "hash";
pub const CURRENCY_KEY: &str = "currency";
pub const USERNAME_KEY: &str = "username";

/// Kind of ledger transaction, stored under the `type` metadata key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerTransactionType {
    Invoice,
    Payment,
    #[serde(rename = "on_us")]
    IntraLedger,
    #[serde(rename = "ln_on_us")]
    LnIntraLedger,
    #[serde(rename = "onchain_on_us")]
    OnchainIntraLedger,
    #[serde(rename = "fee_reimbursement")]
    LnFeeReimbursement,
    OnchainReceipt,
    OnchainPayment,
    Fee,
    Escrow,
    #[serde(rename = "routing_fee")]
    RoutingRevenue,
}

impl LedgerTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "invoice",
            Self::Payment => "payment",
            Self::IntraLedger => "on_us",
            Self::LnIntraLedger => "ln_on_us",
            Self::OnchainIntraLedger => "onchain_on_us",
            Self::LnFeeReimbursement => "fee_reimbursement",
            Self::OnchainReceipt => "onchain_receipt",
            Self::OnchainPayment => "onchain_payment",
            Self::Fee => "fee",
            Self::Escrow => "escrow",
            Self::RoutingRevenue => "routing_fee",
        }
    }
}

impl fmt::Display for LedgerTransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form key/value annotation attached to journal lines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxMetadata(Map<String, Value>);

impl TxMetadata {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Copy of `self` with every key of `overrides` written over it
    pub fn merged(&self, overrides: &TxMetadata) -> TxMetadata {
        let mut merged = self.clone();
        for (key, value) in overrides.iter() {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Copy of `self` tagged with the currency of one line
    pub fn with_currency(&self, currency: WalletCurrency) -> TxMetadata {
        self.clone().with(CURRENCY_KEY, currency.code())
    }

    pub fn tx_type(&self) -> Option<LedgerTransactionType> {
        self.get(TYPE_KEY)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn pending(&self) -> Option<bool> {
        self.get_bool(PENDING_KEY)
    }

    pub fn hash(&self) -> Option<&str> {
        self.get_str(HASH_KEY)
    }
}
