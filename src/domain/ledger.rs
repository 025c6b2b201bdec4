use serde::{Deserialize, Serialize};

use super::{Cents, Transaction};

/// Split transactions into deposits (amount > 0) and expenses (amount < 0).
/// Zero-amount transactions end up in neither list.
pub fn partition(transactions: &[Transaction]) -> (Vec<&Transaction>, Vec<&Transaction>) {
    let deposits = transactions.iter().filter(|t| t.is_deposit()).collect();
    let expenses = transactions.iter().filter(|t| t.is_expense()).collect();
    (deposits, expenses)
}

/// Sum of signed amounts.
///
/// Additions saturate at the `i64` limits, which validated amounts never
/// reach; rows written to the store by other tools cannot make this panic.
pub fn sum<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Cents {
    transactions
        .into_iter()
        .fold(0, |total: Cents, t| total.saturating_add(t.amount_cents))
}

/// Subtotal of all deposits.
pub fn total_deposits(transactions: &[Transaction]) -> Cents {
    sum(transactions.iter().filter(|t| t.is_deposit()))
}

/// Subtotal of all expenses, as a positive magnitude.
pub fn total_expenses(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|t| t.is_expense())
        .fold(0, |total: Cents, t| {
            total.saturating_add(t.amount_cents.saturating_abs())
        })
}

/// Balance = deposits - |expenses|, which is the same as the plain sum.
pub fn balance(transactions: &[Transaction]) -> Cents {
    total_deposits(transactions).saturating_sub(total_expenses(transactions))
}

/// Derived figures for display. Always recomputed, never cached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_deposits: Cents,
    pub total_expenses: Cents,
    pub balance: Cents,
    pub deposit_count: usize,
    pub expense_count: usize,
}

impl LedgerSummary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let total_deposits = total_deposits(transactions);
        let total_expenses = total_expenses(transactions);

        Self {
            total_deposits,
            total_expenses,
            balance: total_deposits.saturating_sub(total_expenses),
            deposit_count: transactions.iter().filter(|t| t.is_deposit()).count(),
            expense_count: transactions.iter().filter(|t| t.is_expense()).count(),
        }
    }
}
