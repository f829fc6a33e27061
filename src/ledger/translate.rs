use serde_json::Value;

use crate::domain::{
    LedgerTransaction, LedgerTransactionMetadata, OnChainTxHash, PaymentHash, USERNAME_KEY,
};
use crate::storage::JournalRecord;

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Domain view of a journal line.
///
/// Everything comes from the line itself except the revealed preimage, which
/// only the metadata store knows.
pub fn to_ledger_transaction(
    record: JournalRecord,
    metadata: Option<&LedgerTransactionMetadata>,
) -> LedgerTransaction {
    let line = &record.metadata;
    let hash = line.hash();

    LedgerTransaction {
        wallet_id: record.account.wallet_id(),
        tx_type: line.tx_type(),
        debit: record.debit,
        credit: record.credit,
        fee: line.get_u64("fee").unwrap_or(0),
        usd: line.get_f64("usd"),
        fee_usd: line.get_f64("feeUsd"),
        currency: record.currency,
        timestamp: record.timestamp,
        pending_confirmation: line.pending().unwrap_or(false),
        journal_id: record.journal_id.clone(),
        ln_memo: non_empty(Some(record.memo.as_str())),
        username: non_empty(line.get_str(USERNAME_KEY)),
        memo_from_payer: non_empty(line.get_str("memoPayer")),
        payment_hash: hash.filter(|h| !h.is_empty()).map(PaymentHash::new),
        pubkey: non_empty(line.get_str("pubkey")),
        address: line
            .get("payee_addresses")
            .and_then(Value::as_array)
            .and_then(|addresses| addresses.first())
            .and_then(Value::as_str)
            .map(str::to_string),
        tx_hash: hash.filter(|h| !h.is_empty()).map(OnChainTxHash::new),
        fee_known_in_advance: line.get_bool("feeKnownInAdvance").unwrap_or(false),
        revealed_preimage: metadata.and_then(|m| m.revealed_preimage().cloned()),
        id: record.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        HASH_KEY, LedgerAccountId, LedgerJournalId, LedgerTransactionId, LedgerTransactionType,
        PENDING_KEY, RevealedPreImage, TYPE_KEY, TransactionMetadataDetails, TxMetadata,
        WalletCurrency, WalletId,
    };
    use chrono::Utc;
    use serde_json::json;

    fn record(account: &str, metadata: TxMetadata) -> JournalRecord {
        JournalRecord {
            id: LedgerTransactionId::new("tx1"),
            journal_id: LedgerJournalId::new("j1"),
            account: LedgerAccountId::new(account),
            debit: 2000,
            credit: 0,
            currency: WalletCurrency::Btc,
            timestamp: Utc::now(),
            metadata,
            memo: "coffee".to_string(),
            voided: false,
            sequence: 0,
        }
    }

    #[test]
    fn translates_native_fields() {
        let metadata = TxMetadata::new()
            .with(TYPE_KEY, "payment")
            .with(PENDING_KEY, true)
            .with(HASH_KEY, "abc")
            .with("fee", 111u64)
            .with("usd", 20.0)
            .with("pubkey", "02ff")
            .with("feeKnownInAdvance", true)
            .with("payee_addresses", json!(["bc1qfirst", "bc1qsecond"]));

        let tx = to_ledger_transaction(record("Liabilities:w1", metadata), None);

        assert_eq!(tx.id, LedgerTransactionId::new("tx1"));
        assert_eq!(tx.wallet_id, Some(WalletId::new("w1")));
        assert_eq!(tx.tx_type, Some(LedgerTransactionType::Payment));
        assert_eq!(tx.debit, 2000);
        assert_eq!(tx.fee, 111);
        assert_eq!(tx.usd, Some(20.0));
        assert!(tx.pending_confirmation);
        assert_eq!(tx.ln_memo.as_deref(), Some("coffee"));
        assert_eq!(tx.payment_hash, Some(PaymentHash::new("abc")));
        assert_eq!(tx.tx_hash, Some(OnChainTxHash::new("abc")));
        assert_eq!(tx.pubkey.as_deref(), Some("02ff"));
        assert_eq!(tx.address.as_deref(), Some("bc1qfirst"));
        assert!(tx.fee_known_in_advance);
        assert_eq!(tx.revealed_preimage, None);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let tx = to_ledger_transaction(record("Assets:Reserve:Lightning", TxMetadata::new()), None);

        assert_eq!(tx.wallet_id, None);
        assert_eq!(tx.tx_type, None);
        assert_eq!(tx.fee, 0);
        assert!(!tx.pending_confirmation);
        assert!(!tx.fee_known_in_advance);
        assert_eq!(tx.username, None);
        assert_eq!(tx.address, None);
    }

    #[test]
    fn preimage_comes_from_metadata_store() {
        let stored = LedgerTransactionMetadata {
            id: LedgerTransactionId::new("tx1"),
            details: TransactionMetadataDetails::Ln {
                hash: PaymentHash::new("abc"),
                revealed_preimage: Some(RevealedPreImage::new("secret")),
            },
        };

        let tx = to_ledger_transaction(record("Liabilities:w1", TxMetadata::new()), Some(&stored));
        assert_eq!(tx.revealed_preimage, Some(RevealedPreImage::new("secret")));
    }
}
