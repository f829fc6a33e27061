use std::sync::Arc;

use tracing::{debug, error};

use super::entry_builder::{EntryBuilder, EntryBuilderCredit, EntryBuilderDebit};
use super::error::EngineError;
use crate::domain::metadata_factory::{
    self, LnFeeReimbursement, LnIntraledger, LnReceive, LnSend, OnChainIntraledger,
    OnChainReceive, OnChainSend, WalletIdIntraledger,
};
use crate::domain::{
    AccountDescriptor, Btc, BtcPaymentAmount, DomainError, Entry, IntraledgerMetadata,
    JournalEntry, LedgerJournal, LedgerTransactionMetadata, PrincipalAmount, StaticAccountIds,
    Transfer, TxMetadata, Usd, WalletCurrency, WalletLeg, ZERO_CENTS, ZERO_SATS,
};
use crate::storage::{Book, TransactionsMetadataRepository};

/// Account on either side of a planned movement
enum Endpoint<'t> {
    Wallet(&'t WalletLeg),
    Lnd,
    ColdStorage,
    BankOwner,
}

/// Everything the entry builder needs for one transfer
struct Plan<'t> {
    description: String,
    metadata: TxMetadata,
    debit_metadata: TxMetadata,
    fee: BtcPaymentAmount,
    amount: PrincipalAmount,
    debit: Endpoint<'t>,
    credit: Endpoint<'t>,
}

fn display_usd(amount: &PrincipalAmount) -> f64 {
    amount.usd.amount() as f64 / 100.0
}

/// Fee priced at the exchange rate implied by the principal
fn fee_display_usd(fee: BtcPaymentAmount, amount: &PrincipalAmount) -> f64 {
    if amount.btc.is_zero() {
        return 0.0;
    }
    fee.amount() as f64 * amount.usd.amount() as f64 / amount.btc.amount() as f64 / 100.0
}

fn sats_only(amount: BtcPaymentAmount) -> PrincipalAmount {
    PrincipalAmount::new(amount, ZERO_CENTS)
}

fn plan(transfer: &Transfer) -> Plan<'_> {
    match transfer {
        Transfer::LnSend {
            from,
            amount,
            fee,
            payment_hash,
            memo,
        } => Plan {
            description: memo.clone().unwrap_or_else(|| "Lightning payment".to_string()),
            metadata: LnSend {
                payment_hash: payment_hash.clone(),
                fee: *fee,
                fee_display_usd: fee_display_usd(*fee, amount),
                amount_display_usd: display_usd(amount),
                pubkey: String::new(),
                fee_known_in_advance: false,
            }
            .into_metadata(),
            debit_metadata: TxMetadata::new(),
            fee: *fee,
            amount: *amount,
            debit: Endpoint::Wallet(from),
            credit: Endpoint::Lnd,
        },
        Transfer::LnReceive {
            to,
            amount,
            fee,
            payment_hash,
            memo,
        } => Plan {
            description: memo.clone().unwrap_or_else(|| "Lightning receipt".to_string()),
            metadata: LnReceive {
                payment_hash: payment_hash.clone(),
                fee: *fee,
                fee_display_usd: fee_display_usd(*fee, amount),
                amount_display_usd: display_usd(amount),
            }
            .into_metadata(),
            debit_metadata: TxMetadata::new(),
            fee: *fee,
            amount: *amount,
            debit: Endpoint::Lnd,
            credit: Endpoint::Wallet(to),
        },
        Transfer::OnChainSend {
            from,
            amount,
            fee,
            tx_hash,
            address,
        } => Plan {
            description: "On-chain payment".to_string(),
            metadata: OnChainSend {
                on_chain_tx_hash: tx_hash.clone(),
                fee: *fee,
                fee_display_usd: fee_display_usd(*fee, amount),
                amount_display_usd: display_usd(amount),
                payee_addresses: address.iter().cloned().collect(),
                send_all: false,
            }
            .into_metadata(),
            debit_metadata: TxMetadata::new(),
            fee: *fee,
            amount: *amount,
            debit: Endpoint::Wallet(from),
            credit: Endpoint::ColdStorage,
        },
        Transfer::OnChainReceive {
            to,
            amount,
            fee,
            tx_hash,
            address,
        } => Plan {
            description: "On-chain receipt".to_string(),
            metadata: OnChainReceive {
                on_chain_tx_hash: tx_hash.clone(),
                fee: *fee,
                fee_display_usd: fee_display_usd(*fee, amount),
                amount_display_usd: display_usd(amount),
                payee_addresses: address.iter().cloned().collect(),
            }
            .into_metadata(),
            debit_metadata: TxMetadata::new(),
            fee: *fee,
            amount: *amount,
            debit: Endpoint::ColdStorage,
            credit: Endpoint::Wallet(to),
        },
        Transfer::Intraledger {
            from,
            to,
            amount,
            memo,
        } => intraledger(
            "Intraledger transfer",
            from,
            to,
            amount,
            WalletIdIntraledger {
                amount_display_usd: display_usd(amount),
                memo_of_payer: memo.clone(),
                ..Default::default()
            }
            .into_metadata(),
        ),
        Transfer::LnIntraledger {
            from,
            to,
            amount,
            payment_hash,
            memo,
        } => intraledger(
            "Lightning intraledger transfer",
            from,
            to,
            amount,
            LnIntraledger {
                amount_display_usd: display_usd(amount),
                memo_of_payer: memo.clone(),
                sender_username: None,
                recipient_username: None,
                pubkey: String::new(),
                payment_hash: payment_hash.clone(),
            }
            .into_metadata(),
        ),
        Transfer::OnChainIntraledger {
            from,
            to,
            amount,
            address,
            memo,
        } => intraledger(
            "On-chain intraledger transfer",
            from,
            to,
            amount,
            OnChainIntraledger {
                amount_display_usd: display_usd(amount),
                payee_addresses: address.iter().cloned().collect(),
                memo_of_payer: memo.clone(),
                ..Default::default()
            }
            .into_metadata(),
        ),
        Transfer::FeeReimbursement {
            to,
            amount,
            payment_hash,
            related_journal,
        } => Plan {
            description: "Fee reimbursement".to_string(),
            metadata: LnFeeReimbursement {
                payment_hash: payment_hash.clone(),
                journal_id: related_journal.clone(),
                amount_display_usd: display_usd(amount),
            }
            .into_metadata(),
            debit_metadata: TxMetadata::new(),
            fee: ZERO_SATS,
            amount: *amount,
            debit: Endpoint::Lnd,
            credit: Endpoint::Wallet(to),
        },
        Transfer::Escrow { amount } => Plan {
            description: "Escrow".to_string(),
            metadata: metadata_factory::escrow(),
            debit_metadata: TxMetadata::new(),
            fee: ZERO_SATS,
            amount: sats_only(*amount),
            debit: Endpoint::BankOwner,
            credit: Endpoint::Lnd,
        },
        Transfer::ChannelFee { amount, tx_hash } => Plan {
            description: "Channel open or close fee".to_string(),
            metadata: metadata_factory::ln_channel_open_or_closing_fee(tx_hash),
            debit_metadata: TxMetadata::new(),
            fee: ZERO_SATS,
            amount: sats_only(*amount),
            debit: Endpoint::BankOwner,
            credit: Endpoint::Lnd,
        },
        Transfer::RoutingRevenue {
            amount,
            collected_on,
        } => Plan {
            description: "Routing revenue".to_string(),
            metadata: metadata_factory::ln_routing_revenue(*collected_on),
            debit_metadata: TxMetadata::new(),
            fee: ZERO_SATS,
            amount: sats_only(*amount),
            debit: Endpoint::Lnd,
            credit: Endpoint::BankOwner,
        },
    }
}

fn intraledger<'t>(
    description: &str,
    from: &'t WalletLeg,
    to: &'t WalletLeg,
    amount: &PrincipalAmount,
    metadata: IntraledgerMetadata,
) -> Plan<'t> {
    Plan {
        description: description.to_string(),
        metadata: metadata.metadata,
        debit_metadata: metadata.debit_account_additional_metadata,
        fee: ZERO_SATS,
        amount: *amount,
        debit: Endpoint::Wallet(from),
        credit: Endpoint::Wallet(to),
    }
}

fn bank_owner(accounts: &StaticAccountIds) -> AccountDescriptor<Btc> {
    AccountDescriptor::new(accounts.bank_owner.clone())
}

fn debit<'a, E: Entry>(
    builder: EntryBuilderDebit<'a, E>,
    endpoint: &Endpoint<'_>,
    additional: &TxMetadata,
    accounts: &StaticAccountIds,
) -> EntryBuilderCredit<'a, E> {
    match endpoint {
        Endpoint::Wallet(leg) => match leg.currency {
            WalletCurrency::Btc => builder.debit_account_with_metadata(
                &AccountDescriptor::<Btc>::for_wallet(&leg.wallet_id),
                additional,
            ),
            WalletCurrency::Usd => builder.debit_account_with_metadata(
                &AccountDescriptor::<Usd>::for_wallet(&leg.wallet_id),
                additional,
            ),
        },
        Endpoint::Lnd => builder.debit_lnd(),
        Endpoint::ColdStorage => builder.debit_cold_storage(),
        Endpoint::BankOwner => builder.debit_account(&bank_owner(accounts)),
    }
}

fn credit<'a, E: Entry>(
    builder: EntryBuilderCredit<'a, E>,
    endpoint: &Endpoint<'_>,
    accounts: &StaticAccountIds,
) -> Result<&'a mut E, DomainError> {
    match endpoint {
        Endpoint::Wallet(leg) => match leg.currency {
            WalletCurrency::Btc => {
                builder.credit_account(&AccountDescriptor::<Btc>::for_wallet(&leg.wallet_id))
            }
            WalletCurrency::Usd => {
                builder.credit_account(&AccountDescriptor::<Usd>::for_wallet(&leg.wallet_id))
            }
        },
        Endpoint::Lnd => builder.credit_lnd(),
        Endpoint::ColdStorage => builder.credit_cold_storage(),
        Endpoint::BankOwner => builder.credit_account(&bank_owner(accounts)),
    }
}

/// Transfer processor turning transfers into committed journals
pub struct TransferProcessor<B, R>
where
    B: Book,
    R: TransactionsMetadataRepository,
{
    book: Arc<B>,
    metadata: Arc<R>,
    accounts: StaticAccountIds,
}

impl<B, R> TransferProcessor<B, R>
where
    B: Book,
    R: TransactionsMetadataRepository,
{
    pub fn new(book: Arc<B>, metadata: Arc<R>, accounts: StaticAccountIds) -> Self {
        Self {
            book,
            metadata,
            accounts,
        }
    }

    /// Get reference to the book for balance snapshots
    pub fn book(&self) -> &Arc<B> {
        &self.book
    }

    pub fn accounts(&self) -> &StaticAccountIds {
        &self.accounts
    }

    /// Build the entry for `transfer` without committing it
    pub fn build_entry(&self, transfer: &Transfer) -> Result<JournalEntry, DomainError> {
        let plan = plan(transfer);
        let mut entry = JournalEntry::new(plan.description);

        let builder = EntryBuilder::new(&mut entry, &self.accounts, plan.metadata)
            .with_fee(plan.fee)
            .with_amount(plan.amount)?;
        let builder = debit(builder, &plan.debit, &plan.debit_metadata, &self.accounts);
        credit(builder, &plan.credit, &self.accounts)?;

        Ok(entry)
    }

    /// Record a single transfer.
    ///
    /// Metadata is persisted after the commit. A metadata failure is logged
    /// and the committed journal is still returned, since its lines are
    /// already in the book.
    pub async fn process(&self, transfer: Transfer) -> Result<LedgerJournal, EngineError> {
        debug!(kind = transfer.kind(), "Processing transfer");

        let entry = self.build_entry(&transfer)?;
        let journal = self.book.commit(entry).await?;

        if let Some(details) = transfer.metadata_details() {
            let records = journal
                .transaction_ids
                .iter()
                .map(|id| LedgerTransactionMetadata {
                    id: id.clone(),
                    details: details.clone(),
                })
                .collect();
            if let Err(e) = self.metadata.persist_all(records).await {
                error!(
                    kind = transfer.kind(),
                    journal_id = %journal.journal_id,
                    error = %e,
                    "Could not persist transaction metadata"
                );
            }
        }

        debug!(
            kind = transfer.kind(),
            journal_id = %journal.journal_id,
            lines = journal.transaction_ids.len(),
            "Recorded transfer"
        );
        Ok(journal)
    }
}
