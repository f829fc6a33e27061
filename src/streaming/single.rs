use futures::{Stream, StreamExt};
use tracing::info;

use super::error::ErrorPolicy;
use crate::domain::Transfer;
use crate::engine::TransferProcessor;
use crate::io::IoError;
use crate::storage::{Book, TransactionsMetadataRepository};

/// Counters for one replayed stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub recorded: usize,
    pub skipped: usize,
}

/// Single stream processing session
pub struct ProcessingSession<B, R, P>
where
    B: Book,
    R: TransactionsMetadataRepository,
    P: ErrorPolicy,
{
    processor: TransferProcessor<B, R>,
    error_policy: P,
    summary: SessionSummary,
}

impl<B, R, P> ProcessingSession<B, R, P>
where
    B: Book,
    R: TransactionsMetadataRepository,
    P: ErrorPolicy,
{
    /// Create a new processing session
    pub fn new(processor: TransferProcessor<B, R>, error_policy: P) -> Self {
        Self {
            processor,
            error_policy,
            summary: SessionSummary::default(),
        }
    }

    /// Process a stream of transfers, one entry at a time in input order.
    ///
    /// Returns false if processing was aborted due to error policy.
    pub async fn process_stream<S>(&mut self, mut stream: S) -> bool
    where
        S: Stream<Item = Result<Transfer, IoError>> + Unpin,
    {
        while let Some(result) = stream.next().await {
            let keep_going = match result {
                Ok(transfer) => match self.processor.process(transfer).await {
                    Ok(_) => {
                        self.summary.recorded += 1;
                        true
                    }
                    Err(e) => {
                        self.summary.skipped += 1;
                        self.error_policy.handle_engine_error(e)
                    }
                },
                Err(e) => {
                    self.summary.skipped += 1;
                    self.error_policy.handle_io_error(e)
                }
            };

            if !keep_going {
                return false;
            }
        }

        info!(
            recorded = self.summary.recorded,
            skipped = self.summary.skipped,
            "Transfer stream finished"
        );
        true
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Get a reference to the underlying book
    pub fn book(&self) -> &B {
        self.processor.book()
    }

    /// Consume the session and return the processor
    pub fn into_processor(self) -> TransferProcessor<B, R> {
        self.processor
    }
}
