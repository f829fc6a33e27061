use tracing::{error, warn};

use crate::engine::EngineError;
use crate::io::IoError;

/// Policy for handling errors during stream processing
pub trait ErrorPolicy: Send + Sync {
    /// Handle an IO error (CSV parsing, reading)
    /// Return true to continue processing, false to abort
    fn handle_io_error(&self, error: IoError) -> bool;

    /// Handle an engine error (entry building, commit)
    /// Return true to continue processing, false to abort
    fn handle_engine_error(&self, error: EngineError) -> bool;
}

/// Skip errors and continue processing
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_io_error(&self, error: IoError) -> bool {
        warn!(%error, "Skipping unreadable transfer");
        true
    }

    fn handle_engine_error(&self, error: EngineError) -> bool {
        warn!(%error, "Skipping rejected transfer");
        true
    }
}

/// Abort on first error
pub struct AbortOnError;

impl ErrorPolicy for AbortOnError {
    fn handle_io_error(&self, error: IoError) -> bool {
        error!(%error, "Aborting on unreadable transfer");
        false
    }

    fn handle_engine_error(&self, error: EngineError) -> bool {
        error!(%error, "Aborting on rejected transfer");
        false
    }
}

/// Silent error policy - skip errors without logging
pub struct SilentSkip;

impl ErrorPolicy for SilentSkip {
    fn handle_io_error(&self, _error: IoError) -> bool {
        true
    }

    fn handle_engine_error(&self, _error: EngineError) -> bool {
        true
    }
}
