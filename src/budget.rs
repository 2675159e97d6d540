use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::month::Month;
use crate::transactions::Transaction;
use crate::types::{BudgetId, BudgetKind, TransactionKind};

/// a month's spending budget, identified by (month, kind)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub month: Month,
    pub kind: BudgetKind,
    /// fixed value for [`BudgetKind::FixedAmount`]; cached income sum for
    /// [`BudgetKind::IncomeBased`], refreshed on read and update
    pub amount: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// budget creation request.
/// the amount is ignored for income-based budgets, which are computed
/// from the month's income transactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudget {
    pub month: Month,
    pub kind: BudgetKind,
    pub amount: Money,
}

/// partial budget update; changing the kind replaces the row, since
/// (month, kind) is the identity key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetPatch {
    pub amount: Option<Money>,
    pub kind: Option<BudgetKind>,
}

/// sum of income transactions dated within the month, utc boundaries
pub fn income_for_month(transactions: &[Transaction], month: Month) -> Money {
    let start = month.start();
    let end = month.end_exclusive();
    transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income && t.date >= start && t.date < end)
        .map(|t| t.amount)
        .sum()
}
