//! Shared metadata for each kind of money movement.
//!
//! `type`, `pending` and `hash` are read back by the ledger queries; the
//! remaining keys are carried for display and auditing.

use chrono::NaiveDate;
use serde_json::Value;

use super::amount::BtcPaymentAmount;
use super::metadata::{HASH_KEY, LedgerTransactionType, PENDING_KEY, TYPE_KEY, TxMetadata, USERNAME_KEY};
use super::transaction::{LedgerJournalId, OnChainTxHash, PaymentHash};

fn base(tx_type: LedgerTransactionType, pending: bool) -> TxMetadata {
    TxMetadata::new()
        .with(TYPE_KEY, tx_type.as_str())
        .with(PENDING_KEY, pending)
}

fn optional(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::String(v.to_string()))
}

/// Shared metadata plus the extra keys only the debited line should carry
#[derive(Debug, Clone, PartialEq)]
pub struct IntraledgerMetadata {
    pub metadata: TxMetadata,
    pub debit_account_additional_metadata: TxMetadata,
}

#[derive(Debug, Clone)]
pub struct LnSend {
    pub payment_hash: PaymentHash,
    pub fee: BtcPaymentAmount,
    pub fee_display_usd: f64,
    pub amount_display_usd: f64,
    pub pubkey: String,
    pub fee_known_in_advance: bool,
}

impl LnSend {
    pub fn into_metadata(self) -> TxMetadata {
        base(LedgerTransactionType::Payment, true)
            .with(HASH_KEY, self.payment_hash.as_str())
            .with("fee", self.fee.amount())
            .with("feeUsd", self.fee_display_usd)
            .with("usd", self.amount_display_usd)
            .with("pubkey", self.pubkey)
            .with("feeKnownInAdvance", self.fee_known_in_advance)
    }
}

#[derive(Debug, Clone)]
pub struct OnChainSend {
    pub on_chain_tx_hash: OnChainTxHash,
    pub fee: BtcPaymentAmount,
    pub fee_display_usd: f64,
    pub amount_display_usd: f64,
    pub payee_addresses: Vec<String>,
    pub send_all: bool,
}

impl OnChainSend {
    pub fn into_metadata(self) -> TxMetadata {
        base(LedgerTransactionType::OnchainPayment, true)
            .with(HASH_KEY, self.on_chain_tx_hash.as_str())
            .with("payee_addresses", self.payee_addresses)
            .with("fee", self.fee.amount())
            .with("feeUsd", self.fee_display_usd)
            .with("usd", self.amount_display_usd)
            .with("sendAll", self.send_all)
    }
}

#[derive(Debug, Clone)]
pub struct OnChainReceive {
    pub on_chain_tx_hash: OnChainTxHash,
    pub fee: BtcPaymentAmount,
    pub fee_display_usd: f64,
    pub amount_display_usd: f64,
    pub payee_addresses: Vec<String>,
}

impl OnChainReceive {
    pub fn into_metadata(self) -> TxMetadata {
        base(LedgerTransactionType::OnchainReceipt, false)
            .with(HASH_KEY, self.on_chain_tx_hash.as_str())
            .with("fee", self.fee.amount())
            .with("feeUsd", self.fee_display_usd)
            .with("usd", self.amount_display_usd)
            .with("payee_addresses", self.payee_addresses)
    }
}

#[derive(Debug, Clone)]
pub struct LnReceive {
    pub payment_hash: PaymentHash,
    pub fee: BtcPaymentAmount,
    pub fee_display_usd: f64,
    pub amount_display_usd: f64,
}

impl LnReceive {
    pub fn into_metadata(self) -> TxMetadata {
        base(LedgerTransactionType::Invoice, false)
            .with(HASH_KEY, self.payment_hash.as_str())
            .with("fee", self.fee.amount())
            .with("feeUsd", self.fee_display_usd)
            .with("usd", self.amount_display_usd)
    }
}

#[derive(Debug, Clone)]
pub struct LnFeeReimbursement {
    pub payment_hash: PaymentHash,
    pub journal_id: LedgerJournalId,
    pub amount_display_usd: f64,
}

impl LnFeeReimbursement {
    pub fn into_metadata(self) -> TxMetadata {
        base(LedgerTransactionType::LnFeeReimbursement, false)
            .with(HASH_KEY, self.payment_hash.as_str())
            .with("related_journal", self.journal_id.as_str())
            .with("usd", self.amount_display_usd)
    }
}

#[derive(Debug, Clone, Default)]
pub struct OnChainIntraledger {
    pub amount_display_usd: f64,
    pub payee_addresses: Vec<String>,
    pub send_all: bool,
    pub memo_of_payer: Option<String>,
    pub sender_username: Option<String>,
    pub recipient_username: Option<String>,
}

impl OnChainIntraledger {
    pub fn into_metadata(self) -> IntraledgerMetadata {
        let metadata = base(LedgerTransactionType::OnchainIntraLedger, false)
            .with("usd", self.amount_display_usd)
            .with("memoPayer", Value::Null)
            .with(USERNAME_KEY, optional(self.sender_username.as_deref()))
            .with("payee_addresses", self.payee_addresses)
            .with("sendAll", self.send_all);
        let debit_account_additional_metadata = TxMetadata::new()
            .with("memoPayer", optional(self.memo_of_payer.as_deref()))
            .with(USERNAME_KEY, optional(self.recipient_username.as_deref()));

        IntraledgerMetadata {
            metadata,
            debit_account_additional_metadata,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WalletIdIntraledger {
    pub amount_display_usd: f64,
    pub memo_of_payer: Option<String>,
    pub sender_username: Option<String>,
    pub recipient_username: Option<String>,
}

impl WalletIdIntraledger {
    pub fn into_metadata(self) -> IntraledgerMetadata {
        let metadata = base(LedgerTransactionType::IntraLedger, false)
            .with("usd", self.amount_display_usd)
            .with("memoPayer", optional(self.memo_of_payer.as_deref()))
            .with(USERNAME_KEY, optional(self.sender_username.as_deref()));
        let debit_account_additional_metadata = TxMetadata::new()
            .with(USERNAME_KEY, optional(self.recipient_username.as_deref()));

        IntraledgerMetadata {
            metadata,
            debit_account_additional_metadata,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LnIntraledger {
    pub amount_display_usd: f64,
    pub memo_of_payer: Option<String>,
    pub sender_username: Option<String>,
    pub recipient_username: Option<String>,
    pub pubkey: String,
    pub payment_hash: PaymentHash,
}

impl LnIntraledger {
    pub fn into_metadata(self) -> IntraledgerMetadata {
        let metadata = base(LedgerTransactionType::LnIntraLedger, false)
            .with("usd", self.amount_display_usd)
            .with("memoPayer", Value::Null)
            .with(USERNAME_KEY, optional(self.sender_username.as_deref()))
            .with(HASH_KEY, self.payment_hash.as_str())
            .with("pubkey", self.pubkey);
        let debit_account_additional_metadata = TxMetadata::new()
            .with("memoPayer", optional(self.memo_of_payer.as_deref()))
            .with(USERNAME_KEY, optional(self.recipient_username.as_deref()));

        IntraledgerMetadata {
            metadata,
            debit_account_additional_metadata,
        }
    }
}

/// Channel open or close fee paid by the bank
pub fn ln_channel_open_or_closing_fee(tx_id: &OnChainTxHash) -> TxMetadata {
    base(LedgerTransactionType::Fee, false).with("txid", tx_id.as_str())
}

pub fn escrow() -> TxMetadata {
    base(LedgerTransactionType::Escrow, false)
}

pub fn ln_routing_revenue(collected_on: NaiveDate) -> TxMetadata {
    base(LedgerTransactionType::RoutingRevenue, false)
        .with("feesCollectedOn", collected_on.format("%a %b %d %Y").to_string())
}
