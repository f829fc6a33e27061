pub mod anomaly;
pub mod error;
pub mod service;
pub mod translate;

// Re-export commonly used types
pub use anomaly::{Anomaly, AnomalyReporter, Severity, TracingAnomalyReporter};
pub use error::LedgerError;
pub use service::LedgerService;
pub use translate::to_ledger_transaction;
