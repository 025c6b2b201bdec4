use std::future::Future;

use thiserror::Error;

use crate::domain::{NewTransaction, Transaction, TransactionId};

/// Failures a ledger store can report.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing service could not be reached. Retrying may succeed.
    #[error("ledger store unavailable: {0:#}")]
    Unavailable(anyhow::Error),

    /// The store refused a write that looked well-formed to the caller.
    #[error("write rejected by ledger store: {0}")]
    WriteRejected(String),

    #[error("transaction not found: {0}")]
    NotFound(TransactionId),
}

/// Durable storage for the transaction set, keyed by id.
///
/// Implementations own their consistency guarantees. Callers must not rely on
/// the order returned by [`LedgerStore::list_all`].
pub trait LedgerStore: Send + Sync {
    /// Every persisted transaction, in no particular order.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;

    /// Persist a new record and return the id assigned to it.
    fn insert(
        &self,
        record: &NewTransaction,
    ) -> impl Future<Output = Result<TransactionId, StoreError>> + Send;

    /// Remove the record with the given id.
    /// Returns [`StoreError::NotFound`] if there is no such record.
    fn delete_by_key(
        &self,
        id: TransactionId,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
