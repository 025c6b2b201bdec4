use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    Cents, LedgerSummary, NewTransaction, Transaction, TransactionId, check_amount, parse_cents,
    partition,
};
use crate::storage::{LedgerStore, SqliteStore, StoreError};

use super::{AppError, Field};

/// Application service providing the ledger's operations.
/// This is the primary interface for any client (CLI, API, TUI, etc.).
///
/// The service owns an in-memory view of the ledger. `load`, `create` and
/// `delete` are serialized through a single writer gate, and every change to
/// the view happens inside one write lock, so readers never observe a
/// half-applied operation.
pub struct LedgerService<S: LedgerStore = SqliteStore> {
    store: S,
    view: RwLock<Vec<Transaction>>,
    writer: Mutex<()>,
}

/// What the presentation layer shows: both partitions and their totals.
#[derive(Debug, Clone)]
pub struct LedgerOverview {
    pub deposits: Vec<Transaction>,
    pub expenses: Vec<Transaction>,
    pub summary: LedgerSummary,
}

impl LedgerService<SqliteStore> {
    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = SqliteStore::init(&db_url).await?;
        Ok(Self::new(store))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = SqliteStore::connect(&db_url).await?;
        Ok(Self::new(store))
    }
}

impl<S: LedgerStore> LedgerService<S> {
    /// Create a new ledger service over the given store. The view starts
    /// empty until [`LedgerService::load`] is called.
    pub fn new(store: S) -> Self {
        Self {
            store,
            view: RwLock::new(Vec::new()),
            writer: Mutex::new(()),
        }
    }

    /// Fetch every transaction from the store and replace the view with it.
    pub async fn load(&self) -> Result<Vec<Transaction>, AppError> {
        let _writer = self.writer.lock().await;

        let mut transactions = self.store.list_all().await.inspect_err(|e| {
            tracing::warn!("Failed to load transactions: {e}");
        })?;
        // Store order is unspecified; sort for stable display
        transactions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));

        tracing::debug!(count = transactions.len(), "Loaded transactions");
        *self.view.write().await = transactions.clone();
        Ok(transactions)
    }

    /// Record a new transaction from raw caller input.
    ///
    /// `amount` is a decimal string such as `"500"` or `"-120.50"`; positive
    /// amounts are deposits and negative ones expenses. Zero is accepted.
    pub async fn create(&self, amount: &str, description: &str) -> Result<Transaction, AppError> {
        validate_description(description)?;
        let amount_cents =
            parse_cents(amount).map_err(|e| AppError::validation(Field::Amount, e.to_string()))?;
        self.record(amount_cents, description).await
    }

    /// Record a new transaction from an amount already in cents.
    pub async fn create_cents(
        &self,
        amount_cents: Cents,
        description: &str,
    ) -> Result<Transaction, AppError> {
        validate_description(description)?;
        let amount_cents = check_amount(amount_cents)
            .map_err(|e| AppError::validation(Field::Amount, e.to_string()))?;
        self.record(amount_cents, description).await
    }

    async fn record(&self, amount_cents: Cents, description: &str) -> Result<Transaction, AppError> {
        let _writer = self.writer.lock().await;

        let pending = NewTransaction::new(amount_cents, description, Utc::now());
        let id = self.store.insert(&pending).await.inspect_err(|e| {
            tracing::warn!("Failed to save transaction: {e}");
        })?;
        let transaction = pending.into_persisted(id);

        self.view.write().await.push(transaction.clone());
        tracing::info!(
            %id,
            amount_cents,
            kind = transaction.kind().as_str(),
            "Recorded transaction"
        );
        Ok(transaction)
    }

    /// Delete a transaction. Deletion is permanent; the caller is expected to
    /// have confirmed it before calling.
    ///
    /// A transaction that is already gone from the store counts as deleted.
    pub async fn delete(&self, id: TransactionId) -> Result<(), AppError> {
        let _writer = self.writer.lock().await;

        match self.store.delete_by_key(id).await {
            Ok(()) => tracing::info!(%id, "Deleted transaction"),
            Err(StoreError::NotFound(_)) => {
                tracing::warn!(%id, "Transaction already absent from store");
            }
            Err(e) => {
                tracing::warn!(%id, "Failed to delete transaction: {e}");
                return Err(e.into());
            }
        }

        self.view.write().await.retain(|t| t.id != id);
        Ok(())
    }

    /// Snapshot of the in-memory view.
    pub async fn transactions(&self) -> Vec<Transaction> {
        self.view.read().await.clone()
    }

    /// Totals over the in-memory view, without touching the store.
    pub async fn summary(&self) -> LedgerSummary {
        LedgerSummary::from_transactions(&self.view.read().await)
    }

    /// Reload from the store and derive everything the overview screen shows.
    pub async fn overview(&self) -> Result<LedgerOverview, AppError> {
        let transactions = self.load().await?;
        let (deposits, expenses) = partition(&transactions);

        Ok(LedgerOverview {
            deposits: deposits.into_iter().cloned().collect(),
            expenses: expenses.into_iter().cloned().collect(),
            summary: LedgerSummary::from_transactions(&transactions),
        })
    }
}

// Whitespace counts as content; only a missing description is refused.
fn validate_description(description: &str) -> Result<(), AppError> {
    if description.is_empty() {
        return Err(AppError::validation(
            Field::Description,
            "must not be empty",
        ));
    }
    Ok(())
}
