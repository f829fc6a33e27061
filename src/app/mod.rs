pub mod cli;
pub mod config;
pub mod error;
pub mod replay;

// Re-export commonly used types
pub use cli::{CliApp, init_tracing};
pub use config::LedgerConfig;
pub use error::AppError;
pub use replay::{replay, replay_with};
