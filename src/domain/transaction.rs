use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Cents;

pub type TransactionId = Uuid;

/// What a transaction does to the club's cash, derived from the sign of its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Expense,
    /// Zero amount. Counts towards neither deposits nor expenses.
    Zero,
}

impl TransactionKind {
    pub fn of(amount_cents: Cents) -> Self {
        match amount_cents.signum() {
            1 => TransactionKind::Deposit,
            -1 => TransactionKind::Expense,
            _ => TransactionKind::Zero,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Expense => "expense",
            TransactionKind::Zero => "zero",
        }
    }
}

/// A validated transaction that has not been persisted yet.
/// The store turns it into a [`Transaction`] by assigning an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount_cents: Cents,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(amount_cents: Cents, description: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            amount_cents,
            description: description.into(),
            date,
        }
    }

    /// Attach the id the store assigned on insert.
    pub fn into_persisted(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            amount_cents: self.amount_cents,
            description: self.description,
            date: self.date,
        }
    }
}

/// A persisted ledger entry.
/// Transactions are immutable: there is no update, only create and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    /// Signed amount in cents: positive is a deposit, negative an expense
    pub amount_cents: Cents,
    pub description: String,
    /// When the transaction was recorded
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        TransactionKind::of(self.amount_cents)
    }

    pub fn is_deposit(&self) -> bool {
        self.amount_cents > 0
    }

    pub fn is_expense(&self) -> bool {
        self.amount_cents < 0
    }
}
