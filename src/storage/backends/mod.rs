//! Student store implementations

pub mod csv;
pub mod memory;
pub mod sql;

pub use self::csv::CsvStore;
pub use memory::MemoryStore;
pub use sql::{SqlDialect, SqlStore};
