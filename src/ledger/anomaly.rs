//! Side channel for conditions that are reported rather than returned.

use std::fmt;
use std::sync::Arc;

use tracing::error;

use crate::domain::WalletId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => f.write_str("critical"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// A customer wallet summed below zero, which points at a reconciliation bug
    NegativeBalance { wallet_id: WalletId, balance: i64 },
}

impl Anomaly {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NegativeBalance { .. } => Severity::Critical,
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeBalance { wallet_id, balance } => {
                write!(f, "Balance of wallet {wallet_id} is less than zero: {balance}")
            }
        }
    }
}

/// Receives anomalies without affecting the operation that found them
pub trait AnomalyReporter: Send + Sync {
    fn report(&self, anomaly: Anomaly);
}

impl<T: AnomalyReporter + ?Sized> AnomalyReporter for Arc<T> {
    fn report(&self, anomaly: Anomaly) {
        (**self).report(anomaly)
    }
}

/// Emits anomalies as tracing events
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAnomalyReporter;

impl AnomalyReporter for TracingAnomalyReporter {
    fn report(&self, anomaly: Anomaly) {
        let severity = anomaly.severity();
        error!(severity = %severity, "{anomaly}");
    }
}
