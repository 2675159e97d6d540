use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// unique identifier for a credit card
pub type CardId = Uuid;

/// unique identifier for a credit card purchase
pub type PurchaseId = Uuid;

/// unique identifier for a cash transaction
pub type TransactionId = Uuid;

/// unique identifier for a category (card or cash)
pub type CategoryId = Uuid;

/// unique identifier for a budget row
pub type BudgetId = Uuid;

/// cash transaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "INCOME"),
            TransactionKind::Expense => write!(f, "EXPENSE"),
        }
    }
}

/// how a month's budget amount is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetKind {
    /// amount is fixed by the user
    FixedAmount,
    /// amount is recomputed from the month's income transactions
    IncomeBased,
}

impl fmt::Display for BudgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetKind::FixedAmount => write!(f, "FIXED_AMOUNT"),
            BudgetKind::IncomeBased => write!(f, "INCOME_BASED"),
        }
    }
}
