pub mod error;
pub mod journal;
pub mod metadata;
pub mod query;
pub mod traits;

// Re-export commonly used types
pub use error::StorageError;
pub use journal::InMemoryBook;
pub use metadata::InMemoryMetadataRepository;
pub use query::{AccountBalance, JournalQuery, JournalRecord};
pub use traits::{Book, TransactionsMetadataRepository};
