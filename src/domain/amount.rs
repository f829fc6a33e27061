use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Add, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// Settlement currency of a wallet or ledger account
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WalletCurrency {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "USD")]
    Usd,
}

impl WalletCurrency {
    /// Ticker as written into line metadata
    pub fn code(&self) -> &'static str {
        match self {
            Self::Btc => "BTC",
            Self::Usd => "USD",
        }
    }
}

impl fmt::Display for WalletCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WalletCurrency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BTC" => Ok(Self::Btc),
            "USD" => Ok(Self::Usd),
            _ => Err(DomainError::UnknownCurrency(s.to_string())),
        }
    }
}

/// Compile-time currency marker carried by typed amounts and descriptors
pub trait Currency:
    Copy + Ord + Hash + Default + Send + Sync + fmt::Debug + 'static
{
    const WALLET_CURRENCY: WalletCurrency;
}

/// Bitcoin, counted in satoshis
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Btc;

/// US dollars, counted in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Usd;

impl Currency for Btc {
    const WALLET_CURRENCY: WalletCurrency = WalletCurrency::Btc;
}

impl Currency for Usd {
    const WALLET_CURRENCY: WalletCurrency = WalletCurrency::Usd;
}

/// Non-negative amount in the minor unit of `C`.
///
/// Arithmetic is only defined between amounts of the same currency; mixing
/// BTC and USD operands does not type-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PaymentAmount<C: Currency> {
    amount: u64,
    _currency: PhantomData<C>,
}

pub type BtcPaymentAmount = PaymentAmount<Btc>;
pub type UsdPaymentAmount = PaymentAmount<Usd>;

pub const ZERO_SATS: BtcPaymentAmount = PaymentAmount::new(0);
pub const ZERO_CENTS: UsdPaymentAmount = PaymentAmount::new(0);

impl<C: Currency> PaymentAmount<C> {
    pub const fn new(amount: u64) -> Self {
        Self {
            amount,
            _currency: PhantomData,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0)
    }

    /// Build from a signed integer, rejecting negatives
    pub fn try_from_signed(amount: i64) -> Result<Self, DomainError> {
        u64::try_from(amount)
            .map(Self::new)
            .map_err(|_| DomainError::NegativeAmount(amount))
    }

    /// Parse a whole number of minor units (e.g. "2000" sats, "20" cents)
    pub fn from_minor_units_str(s: &str) -> Result<Self, DomainError> {
        let s = s.trim();
        let signed: i64 = s
            .parse()
            .map_err(|_| DomainError::InvalidAmount(s.to_string()))?;
        Self::try_from_signed(signed)
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn currency(&self) -> WalletCurrency {
        C::WALLET_CURRENCY
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Checked addition, returns None on overflow
    pub fn checked_add(&self, other: Self) -> Option<Self> {
        self.amount.checked_add(other.amount).map(Self::new)
    }

    /// Checked subtraction, returns None when the result would be negative
    pub fn checked_sub(&self, other: Self) -> Option<Self> {
        self.amount.checked_sub(other.amount).map(Self::new)
    }
}

impl<C: Currency> Add for PaymentAmount<C> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.amount + other.amount)
    }
}

impl<C: Currency> Sub for PaymentAmount<C> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.amount - other.amount)
    }
}

impl<C: Currency> fmt::Display for PaymentAmount<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, C::WALLET_CURRENCY)
    }
}

/// Currency-tagged amount of a single journal line, with the currency known
/// only at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAmount {
    pub currency: WalletCurrency,
    pub amount: u64,
}

impl WalletAmount {
    pub fn new(currency: WalletCurrency, amount: u64) -> Self {
        Self { currency, amount }
    }
}

impl<C: Currency> From<PaymentAmount<C>> for WalletAmount {
    fn from(value: PaymentAmount<C>) -> Self {
        Self::new(C::WALLET_CURRENCY, value.amount)
    }
}

/// Principal of one movement, already expressed in both currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrincipalAmount {
    pub btc: BtcPaymentAmount,
    pub usd: UsdPaymentAmount,
}

impl PrincipalAmount {
    pub fn new(btc: BtcPaymentAmount, usd: UsdPaymentAmount) -> Self {
        Self { btc, usd }
    }

    /// The side of the principal denominated in `currency`
    pub fn in_currency(&self, currency: WalletCurrency) -> WalletAmount {
        match currency {
            WalletCurrency::Btc => self.btc.into(),
            WalletCurrency::Usd => self.usd.into(),
        }
    }
}
