use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cards::{CardCategory, CardPurchase, CreditCard};
use crate::decimal::Money;
use crate::transactions::{Category, Transaction, TransactionQuery};
use crate::types::{CardId, CategoryId, TransactionKind};

/// per-category slice of an aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub color: Option<String>,
    pub total: Money,
    pub count: usize,
}

/// per-card slice of an aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTotal {
    pub card_id: CardId,
    pub name: String,
    pub total: Money,
    pub count: usize,
}

/// spending aggregate over card purchases, without installment spreading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSummary {
    pub total_spent: Money,
    pub transaction_count: usize,
    pub category_breakdown: Vec<CategoryTotal>,
    /// per-card totals; empty when the summary is filtered to one card
    pub card_breakdown: Vec<CardTotal>,
}

impl CardSummary {
    /// fold purchases into ordered per-category and per-card totals,
    /// optionally restricted to one card
    pub fn aggregate(
        purchases: &[CardPurchase],
        categories: &BTreeMap<CategoryId, CardCategory>,
        cards: &BTreeMap<CardId, CreditCard>,
        card_filter: Option<CardId>,
    ) -> Self {
        let mut total_spent = Money::ZERO;
        let mut transaction_count = 0;
        let mut by_category: BTreeMap<CategoryId, CategoryTotal> = BTreeMap::new();
        let mut by_card: BTreeMap<CardId, CardTotal> = BTreeMap::new();

        for purchase in purchases {
            if let Some(card_id) = card_filter {
                if purchase.card_id != card_id {
                    continue;
                }
            }

            total_spent += purchase.amount;
            transaction_count += 1;

            let entry = by_category
                .entry(purchase.category_id)
                .or_insert_with(|| CategoryTotal {
                    category_id: purchase.category_id,
                    name: categories
                        .get(&purchase.category_id)
                        .map(|c| c.name.clone())
                        .unwrap_or_default(),
                    color: categories
                        .get(&purchase.category_id)
                        .and_then(|c| c.color.clone()),
                    total: Money::ZERO,
                    count: 0,
                });
            entry.total += purchase.amount;
            entry.count += 1;

            if card_filter.is_none() {
                let entry = by_card.entry(purchase.card_id).or_insert_with(|| CardTotal {
                    card_id: purchase.card_id,
                    name: cards
                        .get(&purchase.card_id)
                        .map(|c| c.name.clone())
                        .unwrap_or_default(),
                    total: Money::ZERO,
                    count: 0,
                });
                entry.total += purchase.amount;
                entry.count += 1;
            }
        }

        CardSummary {
            total_spent,
            transaction_count,
            category_breakdown: by_category.into_values().collect(),
            card_breakdown: by_card.into_values().collect(),
        }
    }

    /// get json representation of the summary
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {e}"))
    }
}

/// income/expense aggregate over cash transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub total_income: Money,
    pub total_expenses: Money,
    pub balance: Money,
    pub income_count: usize,
    pub expense_count: usize,
    pub category_breakdown: Vec<CategoryTotal>,
}

impl TransactionSummary {
    /// fold the transactions matching the query into totals and an
    /// ordered per-category breakdown
    pub fn aggregate(
        transactions: &[Transaction],
        categories: &BTreeMap<CategoryId, Category>,
        query: &TransactionQuery,
    ) -> Self {
        let mut total_income = Money::ZERO;
        let mut total_expenses = Money::ZERO;
        let mut income_count = 0;
        let mut expense_count = 0;
        let mut by_category: BTreeMap<CategoryId, CategoryTotal> = BTreeMap::new();

        for transaction in transactions.iter().filter(|t| query.matches(t)) {
            match transaction.kind {
                TransactionKind::Income => {
                    total_income += transaction.amount;
                    income_count += 1;
                }
                TransactionKind::Expense => {
                    total_expenses += transaction.amount;
                    expense_count += 1;
                }
            }

            let entry = by_category
                .entry(transaction.category_id)
                .or_insert_with(|| CategoryTotal {
                    category_id: transaction.category_id,
                    name: categories
                        .get(&transaction.category_id)
                        .map(|c| c.name.clone())
                        .unwrap_or_default(),
                    color: categories
                        .get(&transaction.category_id)
                        .and_then(|c| c.color.clone()),
                    total: Money::ZERO,
                    count: 0,
                });
            entry.total += transaction.amount;
            entry.count += 1;
        }

        TransactionSummary {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            income_count,
            expense_count,
            category_breakdown: by_category.into_values().collect(),
        }
    }

    /// get json representation of the summary
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {e}"))
    }
}
