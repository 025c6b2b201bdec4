use std::fmt;

use thiserror::Error;

use crate::domain::TransactionId;
use crate::storage::StoreError;

/// Caller-supplied field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amount,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Amount => write!(f, "amount"),
            Field::Description => write!(f, "description"),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: Field, reason: String },

    #[error("Ledger store unavailable: {0:#}")]
    StoreUnavailable(#[from] anyhow::Error),

    #[error("Write rejected by ledger store: {0}")]
    WriteRejected(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),
}

impl AppError {
    pub(crate) fn validation(field: Field, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(source) => AppError::StoreUnavailable(source),
            StoreError::WriteRejected(reason) => AppError::WriteRejected(reason),
            StoreError::NotFound(id) => AppError::TransactionNotFound(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_validation_message_names_field() {
        let err = AppError::validation(Field::Description, "must not be empty");
        assert_eq!(err.to_string(), "Invalid description: must not be empty");

        let err = AppError::validation(Field::Amount, "invalid money format");
        assert_eq!(err.to_string(), "Invalid amount: invalid money format");
    }

    #[test]
    fn test_store_errors_map_one_to_one() {
        let id = Uuid::new_v4();

        assert!(matches!(
            AppError::from(StoreError::Unavailable(anyhow!("offline"))),
            AppError::StoreUnavailable(_)
        ));
        assert!(matches!(
            AppError::from(StoreError::WriteRejected("bad".into())),
            AppError::WriteRejected(reason) if reason == "bad"
        ));
        assert!(matches!(
            AppError::from(StoreError::NotFound(id)),
            AppError::TransactionNotFound(missing) if missing == id
        ));
    }

    #[test]
    fn test_unavailable_message_keeps_context() {
        let source = anyhow!("connection refused").context("Failed to list transactions");
        let err = AppError::from(StoreError::Unavailable(source));

        assert_eq!(
            err.to_string(),
            "Ledger store unavailable: Failed to list transactions: connection refused"
        );
    }
}
