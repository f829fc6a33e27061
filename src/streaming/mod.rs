pub mod error;
pub mod single;

// Re-export commonly used types
pub use error::{AbortOnError, ErrorPolicy, SilentSkip, SkipErrors};
pub use single::{ProcessingSession, SessionSummary};
