// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::Utc;
use club_ledger::application::LedgerService;
use club_ledger::domain::{Cents, Transaction};
use club_ledger::storage::MemoryStore;
use tempfile::TempDir;
use uuid::Uuid;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a service over an in-memory store, returning a second
/// handle to the store for failure injection
pub fn memory_service() -> (LedgerService<MemoryStore>, MemoryStore) {
    let store = MemoryStore::new();
    (LedgerService::new(store.clone()), store)
}

/// Build a transaction value without going through a store
pub fn make_transaction(amount_cents: Cents, description: &str) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        amount_cents,
        description: description.to_string(),
        date: Utc::now(),
    }
}

/// Test fixture: the badminton season used throughout the tests
pub struct SeasonFixture;

impl SeasonFixture {
    /// One deposit and two expenses: balance 329.50
    pub async fn record_basic<S>(service: &LedgerService<S>) -> Result<Vec<Transaction>>
    where
        S: club_ledger::storage::LedgerStore,
    {
        Ok(vec![
            service.create("500", "deposit A").await?,
            service.create("-120.50", "shuttlecocks").await?,
            service.create("-50", "court fee").await?,
        ])
    }
}
