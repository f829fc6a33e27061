pub mod csv_reader;
pub mod csv_writer;
pub mod error;
pub mod parse;

// Re-export commonly used types
pub use csv_reader::CsvTransferStream;
pub use csv_writer::write_balances;
pub use error::IoError;
pub use parse::RawTransferRecord;
