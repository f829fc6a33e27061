//! Double-entry BTC/USD ledger for a custodial wallet service.
//!
//! Entries are assembled with the typestate [`EntryBuilder`](engine::EntryBuilder),
//! committed to a [`Book`](storage::Book) and read back through the
//! [`LedgerService`](ledger::LedgerService).

pub mod app;
pub mod domain;
pub mod engine;
pub mod io;
pub mod ledger;
pub mod prelude;
pub mod storage;
pub mod streaming;
