use chrono::NaiveDate;

use super::account::WalletId;
use super::amount::{BtcPaymentAmount, PrincipalAmount, WalletCurrency};
use super::transaction::{
    LedgerJournalId, OnChainTxHash, PaymentHash, TransactionMetadataDetails,
};

/// Customer wallet on one side of a movement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletLeg {
    pub wallet_id: WalletId,
    pub currency: WalletCurrency,
}

impl WalletLeg {
    pub fn new(wallet_id: impl Into<String>, currency: WalletCurrency) -> Self {
        Self {
            wallet_id: WalletId::new(wallet_id),
            currency,
        }
    }
}

/// Money movements the ledger knows how to record, with separate variants
/// for type safety
#[derive(Debug, Clone, PartialEq)]
pub enum Transfer {
    /// Outgoing Lightning payment, settled against the node
    LnSend {
        from: WalletLeg,
        amount: PrincipalAmount,
        fee: BtcPaymentAmount,
        payment_hash: PaymentHash,
        memo: Option<String>,
    },
    /// Settled Lightning invoice
    LnReceive {
        to: WalletLeg,
        amount: PrincipalAmount,
        fee: BtcPaymentAmount,
        payment_hash: PaymentHash,
        memo: Option<String>,
    },
    OnChainSend {
        from: WalletLeg,
        amount: PrincipalAmount,
        fee: BtcPaymentAmount,
        tx_hash: OnChainTxHash,
        address: Option<String>,
    },
    OnChainReceive {
        to: WalletLeg,
        amount: PrincipalAmount,
        fee: BtcPaymentAmount,
        tx_hash: OnChainTxHash,
        address: Option<String>,
    },
    /// Wallet to wallet by wallet id
    Intraledger {
        from: WalletLeg,
        to: WalletLeg,
        amount: PrincipalAmount,
        memo: Option<String>,
    },
    /// Lightning invoice paid by another wallet of the same ledger
    LnIntraledger {
        from: WalletLeg,
        to: WalletLeg,
        amount: PrincipalAmount,
        payment_hash: PaymentHash,
        memo: Option<String>,
    },
    /// On-chain address owned by another wallet of the same ledger
    OnChainIntraledger {
        from: WalletLeg,
        to: WalletLeg,
        amount: PrincipalAmount,
        address: Option<String>,
        memo: Option<String>,
    },
    /// Refund of the unused part of a Lightning fee, paid out of the Lightning reserve
    FeeReimbursement {
        to: WalletLeg,
        amount: PrincipalAmount,
        payment_hash: PaymentHash,
        related_journal: LedgerJournalId,
    },
    /// Bank-owned sats locked with the Lightning node
    Escrow { amount: BtcPaymentAmount },
    /// Channel open or close fee paid by the bank
    ChannelFee {
        amount: BtcPaymentAmount,
        tx_hash: OnChainTxHash,
    },
    /// Routing fees earned by the node
    RoutingRevenue {
        amount: BtcPaymentAmount,
        collected_on: NaiveDate,
    },
}

impl Transfer {
    /// Kind name as written in transfer files
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LnSend { .. } => "ln_send",
            Self::LnReceive { .. } => "ln_receive",
            Self::OnChainSend { .. } => "on_chain_send",
            Self::OnChainReceive { .. } => "on_chain_receive",
            Self::Intraledger { .. } => "intraledger",
            Self::LnIntraledger { .. } => "ln_intraledger",
            Self::OnChainIntraledger { .. } => "on_chain_intraledger",
            Self::FeeReimbursement { .. } => "fee_reimbursement",
            Self::Escrow { .. } => "escrow",
            Self::ChannelFee { .. } => "channel_fee",
            Self::RoutingRevenue { .. } => "routing_revenue",
        }
    }

    /// Details the metadata store keeps for every line of this transfer
    pub fn metadata_details(&self) -> Option<TransactionMetadataDetails> {
        match self {
            Self::LnSend { payment_hash, .. }
            | Self::LnReceive { payment_hash, .. }
            | Self::LnIntraledger { payment_hash, .. }
            | Self::FeeReimbursement { payment_hash, .. } => Some(TransactionMetadataDetails::Ln {
                hash: payment_hash.clone(),
                revealed_preimage: None,
            }),
            Self::OnChainSend { tx_hash, .. } | Self::OnChainReceive { tx_hash, .. } => {
                Some(TransactionMetadataDetails::OnChain {
                    hash: tx_hash.clone(),
                })
            }
            Self::Intraledger { .. } | Self::OnChainIntraledger { .. } => {
                Some(TransactionMetadataDetails::Intraledger)
            }
            Self::Escrow { .. } | Self::ChannelFee { .. } | Self::RoutingRevenue { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UsdPaymentAmount;

    fn principal() -> PrincipalAmount {
        PrincipalAmount::new(BtcPaymentAmount::new(2000), UsdPaymentAmount::new(20))
    }

    #[test]
    fn kind_names_match_file_format() {
        let transfer = Transfer::Intraledger {
            from: WalletLeg::new("a", WalletCurrency::Btc),
            to: WalletLeg::new("b", WalletCurrency::Usd),
            amount: principal(),
            memo: None,
        };
        assert_eq!(transfer.kind(), "intraledger");
        assert_eq!(
            Transfer::Escrow {
                amount: BtcPaymentAmount::new(1)
            }
            .kind(),
            "escrow"
        );
    }

    #[test]
    fn ln_transfers_keep_their_payment_hash() {
        let transfer = Transfer::LnSend {
            from: WalletLeg::new("a", WalletCurrency::Btc),
            amount: principal(),
            fee: BtcPaymentAmount::new(0),
            payment_hash: PaymentHash::new("hash"),
            memo: None,
        };
        assert_eq!(
            transfer.metadata_details(),
            Some(TransactionMetadataDetails::Ln {
                hash: PaymentHash::new("hash"),
                revealed_preimage: None,
            })
        );
    }

    #[test]
    fn bank_movements_have_no_stored_metadata() {
        let transfer = Transfer::ChannelFee {
            amount: BtcPaymentAmount::new(300),
            tx_hash: OnChainTxHash::new("txid"),
        };
        assert_eq!(transfer.metadata_details(), None);
    }
}
