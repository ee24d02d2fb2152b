//! `refdata-store` — storage providers for reference-data reconciliation:
//! SQLite tables, pipe-delimited flat files, and an in-memory fake.

pub mod csv;
pub mod memory;
pub mod sqlite;

pub use crate::csv::CsvProvider;
pub use crate::memory::{MemoryProvider, StoreOp};
pub use crate::sqlite::SqliteProvider;
