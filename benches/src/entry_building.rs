use std::sync::Arc;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ledger::prelude::*;

fn principal() -> PrincipalAmount {
    PrincipalAmount::new(BtcPaymentAmount::new(2000), UsdPaymentAmount::new(20))
}

fn shared_metadata() -> TxMetadata {
    TxMetadata::new()
        .with("type", "payment")
        .with("pending", true)
        .with("hash", "bench")
}

/// Benchmark a single builder run per currency pair
fn bench_single_build(c: &mut Criterion) {
    let accounts = StaticAccountIds::default();
    let alice = WalletId::new("alice");
    let mut group = c.benchmark_group("single_build");

    group.bench_function("btc_to_lnd_with_fee", |b| {
        b.iter(|| {
            let mut entry = JournalEntry::new("bench");
            EntryBuilder::new(&mut entry, &accounts, shared_metadata())
                .with_fee(BtcPaymentAmount::new(111))
                .with_amount(principal())
                .and_then(|builder| {
                    builder
                        .debit_account(&AccountDescriptor::<Btc>::for_wallet(&alice))
                        .credit_lnd()
                        .map(|_| ())
                })
                .ok();
            black_box(entry)
        })
    });

    group.bench_function("usd_to_lnd_bridged", |b| {
        b.iter(|| {
            let mut entry = JournalEntry::new("bench");
            EntryBuilder::new(&mut entry, &accounts, shared_metadata())
                .without_fee()
                .with_amount(principal())
                .and_then(|builder| {
                    builder
                        .debit_account(&AccountDescriptor::<Usd>::for_wallet(&alice))
                        .credit_lnd()
                        .map(|_| ())
                })
                .ok();
            black_box(entry)
        })
    });

    group.finish();
}

fn transfers(count: usize) -> Vec<Transfer> {
    (0..count)
        .map(|i| Transfer::LnSend {
            from: WalletLeg::new(
                format!("wallet-{}", i % 64),
                if i % 2 == 0 {
                    WalletCurrency::Btc
                } else {
                    WalletCurrency::Usd
                },
            ),
            amount: principal(),
            fee: BtcPaymentAmount::new(11),
            payment_hash: PaymentHash::new(format!("hash-{i}")),
            memo: None,
        })
        .collect()
}

/// Benchmark building and committing transfers into the in-memory book
fn bench_commit_throughput(c: &mut Criterion) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => panic!("Failed to build tokio runtime: {e}"),
    };
    let mut group = c.benchmark_group("commit_throughput");

    for count in [100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.to_async(&runtime).iter_batched(
                || {
                    let processor = TransferProcessor::new(
                        Arc::new(InMemoryBook::new()),
                        Arc::new(InMemoryMetadataRepository::new()),
                        StaticAccountIds::default(),
                    );
                    (processor, transfers(count))
                },
                |(processor, transfers)| async move {
                    for transfer in transfers {
                        black_box(processor.process(transfer).await.ok());
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_build, bench_commit_throughput);
criterion_main!(benches);
