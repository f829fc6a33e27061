use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::TryStreamExt;
use ledger::domain::metadata_factory::WalletIdIntraledger;
use ledger::domain::{
    LedgerTransactionMetadata, MetadataUpdate, OnChainTxHash, RevealedPreImage,
};
use ledger::ledger::Severity;
use ledger::prelude::*;

#[derive(Default)]
struct RecordingReporter {
    reports: Mutex<Vec<Anomaly>>,
}

impl RecordingReporter {
    fn reports(&self) -> Vec<Anomaly> {
        self.reports.lock().unwrap().clone()
    }
}

impl AnomalyReporter for RecordingReporter {
    fn report(&self, anomaly: Anomaly) {
        self.reports.lock().unwrap().push(anomaly);
    }
}

/// Metadata store that is always down
struct UnavailableRepository;

#[async_trait]
impl TransactionsMetadataRepository for UnavailableRepository {
    async fn find_by_id(
        &self,
        _id: &LedgerTransactionId,
    ) -> Result<LedgerTransactionMetadata, StorageError> {
        Err(StorageError::unknown("connection refused"))
    }

    async fn update_by_hash(&self, _update: &MetadataUpdate) -> Result<(), StorageError> {
        Err(StorageError::unknown("connection refused"))
    }

    async fn persist_all(
        &self,
        _records: Vec<LedgerTransactionMetadata>,
    ) -> Result<Vec<LedgerTransactionMetadata>, StorageError> {
        Err(StorageError::unknown("connection refused"))
    }
}

struct Harness {
    processor: TransferProcessor<InMemoryBook, InMemoryMetadataRepository>,
    ledger: LedgerService<InMemoryBook, InMemoryMetadataRepository, Arc<RecordingReporter>>,
    reporter: Arc<RecordingReporter>,
}

fn harness() -> Harness {
    let book = Arc::new(InMemoryBook::new());
    let metadata = Arc::new(InMemoryMetadataRepository::new());
    let reporter = Arc::new(RecordingReporter::default());
    let accounts = StaticAccountIds::default();

    Harness {
        processor: TransferProcessor::new(book.clone(), metadata.clone(), accounts.clone()),
        ledger: LedgerService::new(book, metadata, reporter.clone(), accounts),
        reporter,
    }
}

fn btc(wallet: &str) -> WalletLeg {
    WalletLeg::new(wallet, WalletCurrency::Btc)
}

fn principal(sats: u64) -> PrincipalAmount {
    PrincipalAmount::new(BtcPaymentAmount::new(sats), UsdPaymentAmount::new(sats / 100))
}

fn ln_send(wallet: &str, sats: u64, fee: u64, hash: &str) -> Transfer {
    Transfer::LnSend {
        from: btc(wallet),
        amount: principal(sats),
        fee: BtcPaymentAmount::new(fee),
        payment_hash: PaymentHash::new(hash),
        memo: None,
    }
}

fn ln_receive(wallet: &str, sats: u64, hash: &str) -> Transfer {
    Transfer::LnReceive {
        to: btc(wallet),
        amount: principal(sats),
        fee: BtcPaymentAmount::new(0),
        payment_hash: PaymentHash::new(hash),
        memo: Some("invoice".to_string()),
    }
}

#[tokio::test]
async fn negative_balance_is_returned_and_reported() {
    let h = harness();
    h.processor
        .process(ln_send("alice", 2000, 0, "h1"))
        .await
        .unwrap();

    let balance = h
        .ledger
        .get_wallet_balance(&WalletId::new("alice"))
        .await
        .unwrap();

    assert_eq!(balance, -2000);
    let reports = h.reporter.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].severity(), Severity::Critical);
    assert_eq!(
        reports[0],
        Anomaly::NegativeBalance {
            wallet_id: WalletId::new("alice"),
            balance: -2000,
        }
    );
}

#[tokio::test]
async fn positive_balance_is_not_reported() {
    let h = harness();
    h.processor
        .process(ln_receive("alice", 5000, "h1"))
        .await
        .unwrap();
    h.processor
        .process(ln_send("alice", 2000, 111, "h2"))
        .await
        .unwrap();

    let balance = h
        .ledger
        .get_wallet_balance(&WalletId::new("alice"))
        .await
        .unwrap();

    assert_eq!(balance, 3000);
    assert!(h.reporter.reports().is_empty());
}

#[tokio::test]
async fn transactions_by_hash_carry_metadata_fields() {
    let h = harness();
    h.processor
        .process(ln_send("alice", 2000, 111, "h1"))
        .await
        .unwrap();
    h.ledger
        .update_metadata_by_hash(&MetadataUpdate::Ln {
            hash: PaymentHash::new("h1"),
            revealed_preimage: Some(RevealedPreImage::new("preimage")),
        })
        .await
        .unwrap();

    let transactions = h.ledger.get_transactions_by_hash("h1").await.unwrap();

    // The wallet line and the bank owner fee line live under liabilities
    assert_eq!(transactions.len(), 2);
    let alice = transactions
        .iter()
        .find(|tx| tx.wallet_id == Some(WalletId::new("alice")))
        .unwrap();
    assert_eq!(alice.debit, 2000);
    assert_eq!(alice.fee, 111);
    assert!(alice.pending_confirmation);
    assert_eq!(alice.payment_hash, Some(PaymentHash::new("h1")));
    assert_eq!(
        alice.revealed_preimage,
        Some(RevealedPreImage::new("preimage"))
    );
}

#[tokio::test]
async fn transaction_by_id_round_trips_and_unknown_id_is_not_found() {
    let h = harness();
    h.processor
        .process(ln_receive("alice", 1000, "h1"))
        .await
        .unwrap();
    let listed = h
        .ledger
        .get_transactions_by_wallet_id(&WalletId::new("alice"))
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);

    let found = h.ledger.get_transaction_by_id(&listed[0].id).await.unwrap();
    assert_eq!(found, listed[0]);
    assert_eq!(found.ln_memo.as_deref(), Some("invoice"));

    let missing = h
        .ledger
        .get_transaction_by_id(&LedgerTransactionId::new("missing"))
        .await;
    assert!(matches!(missing, Err(LedgerError::CouldNotFindTransaction)));
}

#[tokio::test]
async fn idempotency_checks_follow_recorded_hashes() {
    let h = harness();
    h.processor
        .process(Transfer::OnChainReceive {
            to: btc("alice"),
            amount: principal(10_000),
            fee: BtcPaymentAmount::new(0),
            tx_hash: OnChainTxHash::new("tx1"),
            address: Some("bc1qalice".to_string()),
        })
        .await
        .unwrap();
    h.processor
        .process(ln_receive("alice", 1000, "settled"))
        .await
        .unwrap();
    h.processor
        .process(ln_send("alice", 500, 0, "in-flight"))
        .await
        .unwrap();

    let alice = WalletId::new("alice");
    let bob = WalletId::new("bob");
    assert!(
        h.ledger
            .is_on_chain_tx_recorded(&alice, &OnChainTxHash::new("tx1"))
            .await
            .unwrap()
    );
    assert!(
        !h.ledger
            .is_on_chain_tx_recorded(&bob, &OnChainTxHash::new("tx1"))
            .await
            .unwrap()
    );
    assert!(
        h.ledger
            .is_ln_tx_recorded(&PaymentHash::new("settled"))
            .await
            .unwrap()
    );
    assert!(
        !h.ledger
            .is_ln_tx_recorded(&PaymentHash::new("in-flight"))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn pending_payments_are_listed_and_counted() {
    let h = harness();
    h.processor
        .process(ln_send("alice", 500, 0, "p1"))
        .await
        .unwrap();
    h.processor
        .process(ln_send("alice", 700, 0, "p2"))
        .await
        .unwrap();
    h.processor
        .process(ln_send("bob", 300, 0, "p3"))
        .await
        .unwrap();
    h.processor
        .process(ln_receive("carol", 300, "r1"))
        .await
        .unwrap();

    let alice = WalletId::new("alice");
    let pending = h.ledger.list_pending_payments(&alice).await.unwrap();
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].payment_hash, Some(PaymentHash::new("p2")));
    assert_eq!(h.ledger.get_pending_payments_count(&alice).await.unwrap(), 2);

    let wallets: HashSet<WalletId> = h
        .ledger
        .list_wallet_ids_with_pending_payments()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(
        wallets,
        HashSet::from([WalletId::new("alice"), WalletId::new("bob")])
    );

    let hashes: Vec<PaymentHash> = h
        .ledger
        .list_all_payment_hashes()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(
        hashes,
        vec![
            PaymentHash::new("p3"),
            PaymentHash::new("p2"),
            PaymentHash::new("p1")
        ]
    );
}

#[tokio::test]
async fn wallet_is_resolved_from_hash_past_the_bank_owner() {
    let h = harness();
    h.processor
        .process(ln_send("alice", 2000, 111, "h1"))
        .await
        .unwrap();

    let wallet = h
        .ledger
        .get_wallet_id_by_transaction_hash("h1")
        .await
        .unwrap();
    assert_eq!(wallet, WalletId::new("alice"));

    let unknown = h.ledger.get_wallet_id_by_transaction_hash("nope").await;
    assert!(matches!(unknown, Err(LedgerError::CouldNotFindTransaction)));
}

#[tokio::test]
async fn contact_username_filters_wallet_history() {
    let h = harness();
    let accounts = StaticAccountIds::default();
    let metadata = WalletIdIntraledger {
        amount_display_usd: 10.0,
        memo_of_payer: Some("dinner".to_string()),
        sender_username: Some("alice_user".to_string()),
        recipient_username: Some("bob_user".to_string()),
    }
    .into_metadata();

    let mut entry = JournalEntry::new("intraledger");
    EntryBuilder::new(&mut entry, &accounts, metadata.metadata)
        .without_fee()
        .with_amount(principal(1000))
        .unwrap()
        .debit_account_with_metadata(
            &AccountDescriptor::<Btc>::for_wallet(&WalletId::new("alice")),
            &metadata.debit_account_additional_metadata,
        )
        .credit_account(&AccountDescriptor::<Btc>::for_wallet(&WalletId::new("bob")))
        .unwrap();
    h.ledger.record(entry).await.unwrap();

    let alice = WalletId::new("alice");
    let with_bob = h
        .ledger
        .get_transactions_by_wallet_id_and_contact_username(&alice, "bob_user")
        .await
        .unwrap();
    assert_eq!(with_bob.len(), 1);
    assert_eq!(with_bob[0].memo_from_payer.as_deref(), Some("dinner"));

    let with_carol = h
        .ledger
        .get_transactions_by_wallet_id_and_contact_username(&alice, "carol")
        .await
        .unwrap();
    assert!(with_carol.is_empty());
}

#[tokio::test]
async fn metadata_outage_does_not_break_queries() {
    let book = Arc::new(InMemoryBook::new());
    let accounts = StaticAccountIds::default();
    let ledger = LedgerService::new(
        book.clone(),
        Arc::new(UnavailableRepository),
        TracingAnomalyReporter,
        accounts.clone(),
    );
    let processor = TransferProcessor::new(
        book,
        Arc::new(InMemoryMetadataRepository::new()),
        accounts,
    );
    processor
        .process(ln_receive("alice", 1000, "h1"))
        .await
        .unwrap();

    let transactions = ledger
        .get_transactions_by_wallet_id(&WalletId::new("alice"))
        .await
        .unwrap();

    assert_eq!(transactions.len(), 1);
    assert_eq!(transactions[0].credit, 1000);
    assert_eq!(transactions[0].revealed_preimage, None);

    let update = ledger
        .update_metadata_by_hash(&MetadataUpdate::OnChain {
            hash: OnChainTxHash::new("tx"),
        })
        .await;
    assert!(matches!(update, Err(LedgerError::Unknown(_))));
}
