mod memory;
mod sqlite;
mod store;

pub use memory::*;
pub use sqlite::*;
pub use store::*;

/// SQL migration for the transactions table
pub const MIGRATION_001_TRANSACTIONS: &str = include_str!("migrations/001_transactions.sql");
