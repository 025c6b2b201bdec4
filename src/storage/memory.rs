use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::anyhow;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{NewTransaction, Transaction, TransactionId};

use super::{LedgerStore, StoreError};

/// In-process ledger store.
///
/// Cloning yields another handle to the same records. Connectivity loss and
/// store-side rejection can be switched on to exercise failure paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    records: RwLock<HashMap<TransactionId, Transaction>>,
    unavailable: AtomicBool,
    reject_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the backing service going away (`false`) or coming back (`true`).
    pub fn set_available(&self, available: bool) {
        self.inner.unavailable.store(!available, Ordering::SeqCst);
    }

    /// Make every insert fail with [`StoreError::WriteRejected`].
    pub fn set_reject_writes(&self, reject: bool) {
        self.inner.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.inner.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow!("memory store is offline")));
        }
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        self.check_available()?;
        Ok(self.inner.records.read().await.values().cloned().collect())
    }

    async fn insert(&self, record: &NewTransaction) -> Result<TransactionId, StoreError> {
        self.check_available()?;
        if self.inner.reject_writes.load(Ordering::SeqCst) {
            return Err(StoreError::WriteRejected("writes are disabled".to_string()));
        }
        if record.description.is_empty() {
            return Err(StoreError::WriteRejected(
                "description must not be empty".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        self.inner
            .records
            .write()
            .await
            .insert(id, record.clone().into_persisted(id));
        Ok(id)
    }

    async fn delete_by_key(&self, id: TransactionId) -> Result<(), StoreError> {
        self.check_available()?;
        match self.inner.records.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound(id)),
        }
    }
}
