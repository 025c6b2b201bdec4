use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::error::ErrorKind;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::domain::{NewTransaction, Transaction, TransactionId};

use super::{LedgerStore, MIGRATION_001_TRANSACTIONS, StoreError};

/// SQLite-backed ledger store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database URL, e.g. `sqlite:club.db`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_TRANSACTIONS)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<Transaction> {
        let id_str: String = row.try_get("id")?;
        let date_str: String = row.try_get("date")?;

        Ok(Transaction {
            id: Uuid::parse_str(&id_str).context("Invalid transaction ID")?,
            amount_cents: row.try_get("amount_cents")?,
            description: row.try_get("description")?,
            date: DateTime::parse_from_rfc3339(&date_str)
                .context("Invalid transaction date")?
                .with_timezone(&Utc),
        })
    }
}

/// Constraint violations are the store refusing the record; everything else
/// means the database could not serve the request.
fn classify(err: sqlx::Error, action: &'static str) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) if !matches!(db_err.kind(), ErrorKind::Other) => {
            StoreError::WriteRejected(db_err.message().to_string())
        }
        other => StoreError::Unavailable(anyhow::Error::new(other).context(action)),
    }
}

impl LedgerStore for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, amount_cents, description, date
            FROM transactions
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to list transactions"))?;

        rows.iter()
            .map(Self::row_to_transaction)
            .collect::<Result<Vec<_>>>()
            .map_err(StoreError::Unavailable)
    }

    async fn insert(&self, record: &NewTransaction) -> Result<TransactionId, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO transactions (id, amount_cents, description, date)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(record.amount_cents)
        .bind(&record.description)
        .bind(record.date.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| classify(e, "Failed to save transaction"))?;

        Ok(id)
    }

    async fn delete_by_key(&self, id: TransactionId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "Failed to delete transaction"))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn test_store() -> (SqliteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("store.db");
        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        let store = SqliteStore::init(&url).await.unwrap();
        (store, temp_dir)
    }

    #[tokio::test]
    async fn test_insert_then_list() {
        let (store, _temp) = test_store().await;
        let record = NewTransaction::new(-12050, "shuttlecocks", Utc::now());

        let id = store.insert(&record).await.unwrap();
        let all = store.list_all().await.unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].amount_cents, -12050);
        assert_eq!(all[0].description, "shuttlecocks");
        assert_eq!(all[0].date.timestamp_micros(), record.date.timestamp_micros());
    }

    #[tokio::test]
    async fn test_insert_assigns_distinct_ids() {
        let (store, _temp) = test_store().await;
        let record = NewTransaction::new(100, "dues", Utc::now());

        let first = store.insert(&record).await.unwrap();
        let second = store.insert(&record).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_description_is_rejected() {
        let (store, _temp) = test_store().await;
        let record = NewTransaction::new(100, "", Utc::now());

        let result = store.insert(&record).await;

        assert!(matches!(result, Err(StoreError::WriteRejected(_))));
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_description_is_stored() {
        let (store, _temp) = test_store().await;
        let record = NewTransaction::new(100, "   ", Utc::now());

        store.insert(&record).await.unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description, "   ");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (store, _temp) = test_store().await;
        let missing = Uuid::new_v4();

        let result = store.delete_by_key(missing).await;

        assert!(matches!(result, Err(StoreError::NotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let (store, _temp) = test_store().await;
        let id = store
            .insert(&NewTransaction::new(5000, "deposit", Utc::now()))
            .await
            .unwrap();

        store.delete_by_key(id).await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_by_key(id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_closed_pool_is_unavailable() {
        let (store, _temp) = test_store().await;
        store.pool.close().await;

        let result = store.list_all().await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
