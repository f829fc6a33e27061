use chrono::NaiveDate;
use serde::Deserialize;

use super::error::IoError;
use crate::domain::{
    BtcPaymentAmount, Currency, LedgerJournalId, OnChainTxHash, PaymentAmount, PaymentHash,
    PrincipalAmount, Transfer, WalletCurrency, WalletLeg, ZERO_CENTS, ZERO_SATS,
};

/// Raw CSV record as read from input.
///
/// Columns not used by a kind are ignored. The `hash` column holds the
/// payment hash, the on-chain tx hash or the destination address depending
/// on the kind; `memo` doubles as the address for on-chain sends and
/// receives, the related journal for fee reimbursements and the collection
/// date for routing revenue.
#[derive(Debug, Default, Deserialize)]
pub struct RawTransferRecord {
    pub kind: String,
    pub debit: Option<String>,
    pub debit_currency: Option<String>,
    pub credit: Option<String>,
    pub credit_currency: Option<String>,
    pub btc: Option<String>,
    pub usd: Option<String>,
    pub fee: Option<String>,
    pub hash: Option<String>,
    pub memo: Option<String>,
}

fn required(value: Option<String>, field: &str, kind: &str) -> Result<String, IoError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| IoError::MissingField(format!("{field} required for {kind}")))
}

fn amount<C: Currency>(value: &str) -> Result<PaymentAmount<C>, IoError> {
    PaymentAmount::from_minor_units_str(value).map_err(|_| IoError::InvalidAmount(value.to_string()))
}

fn optional_amount<C: Currency>(
    value: Option<String>,
    default: PaymentAmount<C>,
) -> Result<PaymentAmount<C>, IoError> {
    match value {
        Some(v) if !v.trim().is_empty() => amount(&v),
        _ => Ok(default),
    }
}

impl RawTransferRecord {
    fn leg(
        &self,
        id: Option<&str>,
        currency: Option<&str>,
        field: &str,
    ) -> Result<WalletLeg, IoError> {
        let wallet_id = required(id.map(str::to_string), field, &self.kind)?;
        let currency = match currency.map(str::trim) {
            None | Some("") => WalletCurrency::Btc,
            Some(code) => code.parse::<WalletCurrency>()?,
        };
        Ok(WalletLeg::new(wallet_id.trim(), currency))
    }

    fn payer(&self) -> Result<WalletLeg, IoError> {
        self.leg(self.debit.as_deref(), self.debit_currency.as_deref(), "debit")
    }

    fn payee(&self) -> Result<WalletLeg, IoError> {
        self.leg(self.credit.as_deref(), self.credit_currency.as_deref(), "credit")
    }

    fn sats(&self) -> Result<BtcPaymentAmount, IoError> {
        amount(&required(self.btc.clone(), "btc", &self.kind)?)
    }

    fn principal(&self) -> Result<PrincipalAmount, IoError> {
        Ok(PrincipalAmount::new(
            self.sats()?,
            optional_amount(self.usd.clone(), ZERO_CENTS)?,
        ))
    }

    fn fee(&self) -> Result<BtcPaymentAmount, IoError> {
        optional_amount(self.fee.clone(), ZERO_SATS)
    }

    fn hash(&self) -> Result<String, IoError> {
        required(self.hash.clone(), "hash", &self.kind).map(|h| h.trim().to_string())
    }

    fn memo(&self) -> Option<String> {
        self.memo
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    fn optional_hash(&self) -> Option<String> {
        self.hash
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
    }

    /// Parse this raw record into a strongly-typed Transfer
    pub fn parse(self) -> Result<Transfer, IoError> {
        let kind = self.kind.trim().to_lowercase();

        match kind.as_str() {
            "ln_send" => Ok(Transfer::LnSend {
                from: self.payer()?,
                amount: self.principal()?,
                fee: self.fee()?,
                payment_hash: PaymentHash::new(self.hash()?),
                memo: self.memo(),
            }),
            "ln_receive" => Ok(Transfer::LnReceive {
                to: self.payee()?,
                amount: self.principal()?,
                fee: self.fee()?,
                payment_hash: PaymentHash::new(self.hash()?),
                memo: self.memo(),
            }),
            "on_chain_send" => Ok(Transfer::OnChainSend {
                from: self.payer()?,
                amount: self.principal()?,
                fee: self.fee()?,
                tx_hash: OnChainTxHash::new(self.hash()?),
                address: self.memo(),
            }),
            "on_chain_receive" => Ok(Transfer::OnChainReceive {
                to: self.payee()?,
                amount: self.principal()?,
                fee: self.fee()?,
                tx_hash: OnChainTxHash::new(self.hash()?),
                address: self.memo(),
            }),
            "intraledger" => Ok(Transfer::Intraledger {
                from: self.payer()?,
                to: self.payee()?,
                amount: self.principal()?,
                memo: self.memo(),
            }),
            "ln_intraledger" => Ok(Transfer::LnIntraledger {
                from: self.payer()?,
                to: self.payee()?,
                amount: self.principal()?,
                payment_hash: PaymentHash::new(self.hash()?),
                memo: self.memo(),
            }),
            "on_chain_intraledger" => Ok(Transfer::OnChainIntraledger {
                from: self.payer()?,
                to: self.payee()?,
                amount: self.principal()?,
                address: self.optional_hash(),
                memo: self.memo(),
            }),
            "fee_reimbursement" => Ok(Transfer::FeeReimbursement {
                to: self.payee()?,
                amount: self.principal()?,
                payment_hash: PaymentHash::new(self.hash()?),
                related_journal: LedgerJournalId::new(
                    self.memo().ok_or_else(|| {
                        IoError::MissingField("memo required for fee_reimbursement".to_string())
                    })?,
                ),
            }),
            "escrow" => Ok(Transfer::Escrow {
                amount: self.sats()?,
            }),
            "channel_fee" => Ok(Transfer::ChannelFee {
                amount: self.sats()?,
                tx_hash: OnChainTxHash::new(self.hash()?),
            }),
            "routing_revenue" => {
                let date = required(self.memo.clone(), "memo", &kind)?;
                let collected_on = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                    .map_err(|_| IoError::InvalidField(format!("collection date {date}")))?;
                Ok(Transfer::RoutingRevenue {
                    amount: self.sats()?,
                    collected_on,
                })
            }
            _ => Err(IoError::InvalidTransferKind(self.kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, UsdPaymentAmount};

    fn record(kind: &str) -> RawTransferRecord {
        RawTransferRecord {
            kind: kind.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn parse_ln_send() {
        let raw = RawTransferRecord {
            debit: Some("alice".to_string()),
            debit_currency: Some("usd".to_string()),
            btc: Some("2000".to_string()),
            usd: Some("20".to_string()),
            fee: Some("10".to_string()),
            hash: Some("abc".to_string()),
            memo: Some("coffee".to_string()),
            ..record("ln_send")
        };

        let transfer = raw.parse().unwrap();
        assert_eq!(
            transfer,
            Transfer::LnSend {
                from: WalletLeg::new("alice", WalletCurrency::Usd),
                amount: PrincipalAmount::new(
                    BtcPaymentAmount::new(2000),
                    UsdPaymentAmount::new(20)
                ),
                fee: BtcPaymentAmount::new(10),
                payment_hash: PaymentHash::new("abc"),
                memo: Some("coffee".to_string()),
            }
        );
    }

    #[test]
    fn parse_intraledger_defaults_to_btc_and_no_fee() {
        let raw = RawTransferRecord {
            debit: Some("alice".to_string()),
            credit: Some("bob".to_string()),
            btc: Some("500".to_string()),
            ..record("intraledger")
        };

        match raw.parse().unwrap() {
            Transfer::Intraledger {
                from,
                to,
                amount,
                memo,
            } => {
                assert_eq!(from.currency, WalletCurrency::Btc);
                assert_eq!(to.wallet_id.as_str(), "bob");
                assert_eq!(amount.usd, ZERO_CENTS);
                assert_eq!(memo, None);
            }
            other => panic!("Expected Intraledger, got {other:?}"),
        }
    }

    #[test]
    fn parse_case_insensitive_kind() {
        let raw = RawTransferRecord {
            btc: Some("10".to_string()),
            ..record(" ESCROW ")
        };

        assert!(matches!(raw.parse(), Ok(Transfer::Escrow { .. })));
    }

    #[test]
    fn parse_routing_revenue_date() {
        let raw = RawTransferRecord {
            btc: Some("42".to_string()),
            memo: Some("2024-03-01".to_string()),
            ..record("routing_revenue")
        };

        match raw.parse().unwrap() {
            Transfer::RoutingRevenue { collected_on, .. } => {
                assert_eq!(collected_on, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
            }
            other => panic!("Expected RoutingRevenue, got {other:?}"),
        }
    }

    #[test]
    fn parse_invalid_kind() {
        let result = record("teleport").parse();
        assert!(matches!(result, Err(IoError::InvalidTransferKind(_))));
    }

    #[test]
    fn parse_missing_wallet() {
        let raw = RawTransferRecord {
            btc: Some("10".to_string()),
            hash: Some("abc".to_string()),
            ..record("ln_receive")
        };
        assert!(matches!(raw.parse(), Err(IoError::MissingField(_))));
    }

    #[test]
    fn parse_missing_hash() {
        let raw = RawTransferRecord {
            debit: Some("alice".to_string()),
            btc: Some("10".to_string()),
            ..record("ln_send")
        };
        assert!(matches!(raw.parse(), Err(IoError::MissingField(_))));
    }

    #[test]
    fn parse_negative_amount() {
        let raw = RawTransferRecord {
            btc: Some("-5".to_string()),
            ..record("escrow")
        };
        assert!(matches!(raw.parse(), Err(IoError::InvalidAmount(_))));
    }

    #[test]
    fn parse_unknown_currency() {
        let raw = RawTransferRecord {
            debit: Some("alice".to_string()),
            debit_currency: Some("EUR".to_string()),
            credit: Some("bob".to_string()),
            btc: Some("10".to_string()),
            ..record("intraledger")
        };
        assert!(matches!(
            raw.parse(),
            Err(IoError::Domain(DomainError::UnknownCurrency(_)))
        ));
    }

    #[test]
    fn parse_bad_collection_date() {
        let raw = RawTransferRecord {
            btc: Some("42".to_string()),
            memo: Some("yesterday".to_string()),
            ..record("routing_revenue")
        };
        assert!(matches!(raw.parse(), Err(IoError::InvalidField(_))));
    }
}
