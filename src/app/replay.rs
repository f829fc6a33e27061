use std::collections::BTreeSet;
use std::sync::Arc;

use futures::{Stream, TryStreamExt};
use tokio::io::AsyncWrite;
use tracing::info;

use super::config::LedgerConfig;
use super::error::AppError;
use crate::domain::{StaticAccountIds, Transfer, WalletId};
use crate::engine::TransferProcessor;
use crate::io::{IoError, write_balances};
use crate::ledger::{AnomalyReporter, LedgerService, TracingAnomalyReporter};
use crate::storage::{AccountBalance, Book, InMemoryBook, InMemoryMetadataRepository};
use crate::streaming::{ProcessingSession, SessionSummary, SkipErrors};

/// Customer wallets present in `balances`, leaving out the bank's own accounts
fn customer_wallets(balances: &[AccountBalance], accounts: &StaticAccountIds) -> BTreeSet<WalletId> {
    let house = [&accounts.bank_owner, &accounts.dealer_btc, &accounts.dealer_usd];
    balances
        .iter()
        .filter(|b| !house.contains(&&b.account))
        .filter_map(|b| b.account.wallet_id())
        .collect()
}

/// Replay `transfers` into a fresh book, skipping bad rows, then write the
/// balance of every account to `writer`.
///
/// Negative customer balances are raised through `reporter`.
pub async fn replay_with<S, W, A>(
    transfers: S,
    writer: W,
    config: &LedgerConfig,
    reporter: A,
) -> Result<SessionSummary, AppError>
where
    S: Stream<Item = Result<Transfer, IoError>> + Unpin,
    W: AsyncWrite + Unpin + Send,
    A: AnomalyReporter,
{
    let book = Arc::new(InMemoryBook::new());
    let metadata = Arc::new(InMemoryMetadataRepository::new());

    let processor =
        TransferProcessor::new(book.clone(), metadata.clone(), config.accounts.clone());
    let mut session = ProcessingSession::new(processor, SkipErrors);
    session.process_stream(transfers).await;
    let summary = session.summary();

    let balances = book.balances().await?;
    let ledger = LedgerService::new(book, metadata, reporter, config.accounts.clone());

    for wallet_id in customer_wallets(&balances, &config.accounts) {
        ledger.get_wallet_balance(&wallet_id).await?;
    }

    let pending: Vec<WalletId> = ledger
        .list_wallet_ids_with_pending_payments()
        .try_collect()
        .await?;
    info!(
        recorded = summary.recorded,
        skipped = summary.skipped,
        wallets_with_pending = pending.len(),
        "Replay finished"
    );

    write_balances(&balances, writer).await?;
    Ok(summary)
}

/// [`replay_with`] reporting anomalies to the log
pub async fn replay<S, W>(
    transfers: S,
    writer: W,
    config: &LedgerConfig,
) -> Result<SessionSummary, AppError>
where
    S: Stream<Item = Result<Transfer, IoError>> + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    replay_with(transfers, writer, config, TracingAnomalyReporter).await
}
