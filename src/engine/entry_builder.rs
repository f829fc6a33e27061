//! Typestate builder for double-entry ledger transactions.
//!
//! A build runs through four stages, each a distinct type that only exposes
//! the next legal step:
//!
//! ```text
//! EntryBuilder --with_fee/with_fee_from_bank--> EntryBuilderAmount
//!     --with_amount--> EntryBuilderDebit --debit_*--> EntryBuilderCredit
//!     --credit_*--> &mut Entry
//! ```
//!
//! Lines are staged and written to the entry by the terminal `credit_*` call,
//! in the order fee line, debit line, dealer lines, credit line. The builder
//! holds the only mutable borrow of the entry until then, so a rejected build
//! leaves the entry untouched.
//!
//! When the debited and credited accounts have different currencies the
//! movement is bridged through the dealer accounts, so the BTC lines and the
//! USD lines of the entry each balance on their own.

use crate::domain::{
    AccountDescriptor, BtcPaymentAmount, Currency, DomainError, Entry, LedgerAccountId,
    PrincipalAmount, StaticAccountIds, TxMetadata, WalletCurrency, ZERO_SATS,
};

/// Who pays the BTC fee of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeePolicy {
    /// Taken out of the principal and credited to the bank owner
    FromPayer(BtcPaymentAmount),
    /// Debited from the bank owner and added on top of the principal
    FromBank(BtcPaymentAmount),
}

impl FeePolicy {
    fn fee(&self) -> BtcPaymentAmount {
        match self {
            Self::FromPayer(fee) | Self::FromBank(fee) => *fee,
        }
    }

    /// Amount credited to the BTC leg once the fee is accounted for
    fn apply(&self, btc: BtcPaymentAmount) -> Result<BtcPaymentAmount, DomainError> {
        match self {
            Self::FromPayer(fee) => {
                btc.checked_sub(*fee)
                    .ok_or(DomainError::FeeExceedsAmount {
                        fee: fee.amount(),
                        principal: btc.amount(),
                    })
            }
            Self::FromBank(fee) => btc.checked_add(*fee).ok_or(DomainError::Overflow),
        }
    }
}

struct Draft<'a, E: Entry> {
    entry: &'a mut E,
    accounts: &'a StaticAccountIds,
    metadata: TxMetadata,
}

struct StagedDebit {
    account_id: LedgerAccountId,
    currency: WalletCurrency,
    metadata: TxMetadata,
}

/// Initial stage: decide how the fee is charged
pub struct EntryBuilder<'a, E: Entry> {
    draft: Draft<'a, E>,
}

impl<'a, E: Entry> EntryBuilder<'a, E> {
    /// Start a build writing into `entry`, with `metadata` shared by every line
    pub fn new(entry: &'a mut E, accounts: &'a StaticAccountIds, metadata: TxMetadata) -> Self {
        Self {
            draft: Draft {
                entry,
                accounts,
                metadata,
            },
        }
    }

    /// Fee paid by the payer: credited to the bank owner and deducted from
    /// the BTC credit leg
    pub fn with_fee(self, fee: BtcPaymentAmount) -> EntryBuilderAmount<'a, E> {
        EntryBuilderAmount {
            draft: self.draft,
            fee: FeePolicy::FromPayer(fee),
        }
    }

    /// Fee paid by the bank: debited from the bank owner and added to the
    /// BTC credit leg
    pub fn with_fee_from_bank(self, fee: BtcPaymentAmount) -> EntryBuilderAmount<'a, E> {
        EntryBuilderAmount {
            draft: self.draft,
            fee: FeePolicy::FromBank(fee),
        }
    }

    pub fn without_fee(self) -> EntryBuilderAmount<'a, E> {
        self.with_fee(ZERO_SATS)
    }
}

/// Second stage: supply the principal in both currencies
pub struct EntryBuilderAmount<'a, E: Entry> {
    draft: Draft<'a, E>,
    fee: FeePolicy,
}

impl<'a, E: Entry> EntryBuilderAmount<'a, E> {
    /// Store the principal as given; no conversion happens here.
    ///
    /// Fails when the fee cannot be applied to the BTC principal.
    pub fn with_amount(
        self,
        amount: PrincipalAmount,
    ) -> Result<EntryBuilderDebit<'a, E>, DomainError> {
        let btc_credit = self.fee.apply(amount.btc)?;
        Ok(EntryBuilderDebit {
            draft: self.draft,
            fee: self.fee,
            amount,
            btc_credit,
        })
    }
}

/// Third stage: choose the debited account
pub struct EntryBuilderDebit<'a, E: Entry> {
    draft: Draft<'a, E>,
    fee: FeePolicy,
    amount: PrincipalAmount,
    btc_credit: BtcPaymentAmount,
}

impl<'a, E: Entry> EntryBuilderDebit<'a, E> {
    /// Debit the full principal in the account's own currency
    pub fn debit_account<C: Currency>(
        self,
        descriptor: &AccountDescriptor<C>,
    ) -> EntryBuilderCredit<'a, E> {
        let metadata = self.draft.metadata.with_currency(C::WALLET_CURRENCY);
        self.stage_debit(descriptor.id().clone(), C::WALLET_CURRENCY, metadata)
    }

    /// As [`debit_account`](Self::debit_account), with extra keys on the
    /// debit line that win over the shared metadata
    pub fn debit_account_with_metadata<C: Currency>(
        self,
        descriptor: &AccountDescriptor<C>,
        additional: &TxMetadata,
    ) -> EntryBuilderCredit<'a, E> {
        let metadata = self
            .draft
            .metadata
            .merged(additional)
            .with_currency(C::WALLET_CURRENCY);
        self.stage_debit(descriptor.id().clone(), C::WALLET_CURRENCY, metadata)
    }

    pub fn debit_lnd(self) -> EntryBuilderCredit<'a, E> {
        let descriptor = self.draft.accounts.lnd_descriptor();
        self.debit_account(&descriptor)
    }

    pub fn debit_cold_storage(self) -> EntryBuilderCredit<'a, E> {
        let descriptor = self.draft.accounts.cold_storage_descriptor();
        self.debit_account(&descriptor)
    }

    fn stage_debit(
        self,
        account_id: LedgerAccountId,
        currency: WalletCurrency,
        metadata: TxMetadata,
    ) -> EntryBuilderCredit<'a, E> {
        EntryBuilderCredit {
            draft: self.draft,
            fee: self.fee,
            amount: self.amount,
            btc_credit: self.btc_credit,
            debit: StagedDebit {
                account_id,
                currency,
                metadata,
            },
        }
    }
}

/// Final stage: choose the credited account and write the entry
pub struct EntryBuilderCredit<'a, E: Entry> {
    draft: Draft<'a, E>,
    fee: FeePolicy,
    amount: PrincipalAmount,
    btc_credit: BtcPaymentAmount,
    debit: StagedDebit,
}

impl<'a, E: Entry> EntryBuilderCredit<'a, E> {
    pub fn credit_account<C: Currency>(
        self,
        descriptor: &AccountDescriptor<C>,
    ) -> Result<&'a mut E, DomainError> {
        self.write(descriptor.id(), C::WALLET_CURRENCY)
    }

    pub fn credit_lnd(self) -> Result<&'a mut E, DomainError> {
        let descriptor = self.draft.accounts.lnd_descriptor();
        self.credit_account(&descriptor)
    }

    pub fn credit_cold_storage(self) -> Result<&'a mut E, DomainError> {
        let descriptor = self.draft.accounts.cold_storage_descriptor();
        self.credit_account(&descriptor)
    }

    fn write(
        self,
        credit_account: &LedgerAccountId,
        credit_currency: WalletCurrency,
    ) -> Result<&'a mut E, DomainError> {
        let debit_currency = self.debit.currency;
        let fee = self.fee.fee();

        // A USD-only movement has no BTC line to absorb the fee
        if !fee.is_zero()
            && debit_currency == WalletCurrency::Usd
            && credit_currency == WalletCurrency::Usd
        {
            return Err(DomainError::FeeRequiresBtcLeg {
                debit: debit_currency,
                credit: credit_currency,
            });
        }

        let EntryBuilderCredit {
            draft:
                Draft {
                    entry,
                    accounts,
                    metadata,
                },
            fee: fee_policy,
            amount,
            btc_credit,
            debit,
        } = self;

        let btc_metadata = metadata.with_currency(WalletCurrency::Btc);
        let usd_metadata = metadata.with_currency(WalletCurrency::Usd);

        if !fee.is_zero() {
            match fee_policy {
                FeePolicy::FromPayer(_) => {
                    entry.credit(&accounts.bank_owner, fee.into(), btc_metadata.clone());
                }
                FeePolicy::FromBank(_) => {
                    entry.debit(&accounts.bank_owner, fee.into(), btc_metadata.clone());
                }
            }
        }

        entry.debit(
            &debit.account_id,
            amount.in_currency(debit_currency),
            debit.metadata,
        );

        match (debit_currency, credit_currency) {
            (WalletCurrency::Usd, WalletCurrency::Btc) => {
                entry.debit(&accounts.dealer_btc, amount.btc.into(), btc_metadata.clone());
                entry.credit(&accounts.dealer_usd, amount.usd.into(), usd_metadata.clone());
            }
            (WalletCurrency::Btc, WalletCurrency::Usd) => {
                entry.credit(&accounts.dealer_btc, btc_credit.into(), btc_metadata.clone());
                entry.debit(&accounts.dealer_usd, amount.usd.into(), usd_metadata.clone());
            }
            _ => {}
        }

        match credit_currency {
            WalletCurrency::Btc => entry.credit(credit_account, btc_credit.into(), btc_metadata),
            WalletCurrency::Usd => entry.credit(credit_account, amount.usd.into(), usd_metadata),
        };

        Ok(entry)
    }
}
