pub mod entry_builder;
pub mod error;
pub mod processor;

// Re-export commonly used types
pub use entry_builder::{EntryBuilder, EntryBuilderAmount, EntryBuilderCredit, EntryBuilderDebit};
pub use error::EngineError;
pub use processor::TransferProcessor;
