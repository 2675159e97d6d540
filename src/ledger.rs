use std::collections::BTreeMap;

use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::{debug, info};
use uuid::Uuid;

use crate::billing::statement::CardBill;
use crate::budget::{income_for_month, Budget, BudgetPatch, NewBudget};
use crate::cards::{
    CardCategory, CardCategoryPatch, CardPatch, CardPurchase, CreditCard, NewCard, NewCardCategory,
    NewPurchase, PurchasePatch,
};
use crate::errors::{LedgerError, Result};
use crate::month::Month;
use crate::summary::{CardSummary, TransactionSummary};
use crate::transactions::{
    Category, CategoryPatch, NewCategory, NewTransaction, Page, Transaction, TransactionPatch,
    TransactionQuery,
};
use crate::decimal::Money;
use crate::types::{BudgetKind, CardId, CategoryId, PurchaseId, TransactionId, TransactionKind};

/// in-memory store and front door for every ledger operation.
///
/// rows live in ordered maps; each operation is a synchronous
/// read-then-compute with an optional trailing write (the income-based
/// budget cache refresh). callers needing persistence own it outside
pub struct Ledger {
    time: SafeTimeProvider,
    cards: BTreeMap<CardId, CreditCard>,
    card_categories: BTreeMap<CategoryId, CardCategory>,
    purchases: BTreeMap<PurchaseId, CardPurchase>,
    categories: BTreeMap<CategoryId, Category>,
    transactions: BTreeMap<TransactionId, Transaction>,
    budgets: BTreeMap<(Month, BudgetKind), Budget>,
}

impl Ledger {
    /// create an empty ledger on the system clock
    pub fn new() -> Self {
        Self::with_time(SafeTimeProvider::new(TimeSource::System))
    }

    /// create an empty ledger on an explicit clock
    pub fn with_time(time: SafeTimeProvider) -> Self {
        Self {
            time,
            cards: BTreeMap::new(),
            card_categories: BTreeMap::new(),
            purchases: BTreeMap::new(),
            categories: BTreeMap::new(),
            transactions: BTreeMap::new(),
            budgets: BTreeMap::new(),
        }
    }

    // credit cards

    pub fn create_card(&mut self, new: NewCard) -> Result<CreditCard> {
        new.validate()?;
        let now = self.time.now();
        let card = CreditCard {
            id: Uuid::new_v4(),
            name: new.name,
            limit: new.limit,
            closing_day: new.closing_day,
            due_day: new.due_day,
            color: new.color,
            active: true,
            created_at: now,
            updated_at: now,
        };
        info!(card_id = %card.id, name = %card.name, "created credit card");
        self.cards.insert(card.id, card.clone());
        Ok(card)
    }

    pub fn card(&self, id: CardId) -> Result<&CreditCard> {
        self.cards
            .get(&id)
            .ok_or(LedgerError::CardNotFound { id })
    }

    pub fn cards(&self) -> Vec<&CreditCard> {
        self.cards.values().collect()
    }

    pub fn update_card(&mut self, id: CardId, patch: CardPatch) -> Result<CreditCard> {
        let now = self.time.now();
        let card = self
            .cards
            .get_mut(&id)
            .ok_or(LedgerError::CardNotFound { id })?;
        card.apply(patch)?;
        card.updated_at = now;
        debug!(card_id = %id, "updated credit card");
        Ok(card.clone())
    }

    /// delete a card along with its purchases
    pub fn remove_card(&mut self, id: CardId) -> Result<CreditCard> {
        let card = self
            .cards
            .remove(&id)
            .ok_or(LedgerError::CardNotFound { id })?;
        self.purchases.retain(|_, purchase| purchase.card_id != id);
        info!(card_id = %id, "removed credit card");
        Ok(card)
    }

    // card categories

    pub fn create_card_category(&mut self, new: NewCardCategory) -> Result<CardCategory> {
        new.validate()?;
        let category = CardCategory {
            id: Uuid::new_v4(),
            name: new.name,
            color: new.color,
        };
        debug!(category_id = %category.id, name = %category.name, "created card category");
        self.card_categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub fn card_category(&self, id: CategoryId) -> Result<&CardCategory> {
        self.card_categories
            .get(&id)
            .ok_or(LedgerError::CategoryNotFound { id })
    }

    /// all card categories, sorted by name
    pub fn card_categories(&self) -> Vec<&CardCategory> {
        let mut categories: Vec<&CardCategory> = self.card_categories.values().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    pub fn update_card_category(
        &mut self,
        id: CategoryId,
        patch: CardCategoryPatch,
    ) -> Result<CardCategory> {
        let category = self
            .card_categories
            .get_mut(&id)
            .ok_or(LedgerError::CategoryNotFound { id })?;
        category.apply(patch)?;
        Ok(category.clone())
    }

    pub fn remove_card_category(&mut self, id: CategoryId) -> Result<CardCategory> {
        self.card_categories
            .remove(&id)
            .ok_or(LedgerError::CategoryNotFound { id })
    }

    // card purchases

    pub fn add_purchase(&mut self, new: NewPurchase) -> Result<CardPurchase> {
        new.validate()?;
        if !self.cards.contains_key(&new.card_id) {
            return Err(LedgerError::CardNotFound { id: new.card_id });
        }
        if !self.card_categories.contains_key(&new.category_id) {
            return Err(LedgerError::CategoryNotFound {
                id: new.category_id,
            });
        }

        let purchase = CardPurchase {
            id: Uuid::new_v4(),
            date: new.date,
            amount: new.amount,
            description: new.description,
            category_id: new.category_id,
            card_id: new.card_id,
            installments: new.installments.unwrap_or(1),
            current_installment: new.current_installment,
            created_at: self.time.now(),
        };
        info!(
            purchase_id = %purchase.id,
            card_id = %purchase.card_id,
            amount = %purchase.amount,
            installments = purchase.installments,
            "recorded card purchase"
        );
        self.purchases.insert(purchase.id, purchase.clone());
        Ok(purchase)
    }

    /// purchases sorted by date descending, optionally for one card
    pub fn purchases(&self, card_id: Option<CardId>) -> Vec<&CardPurchase> {
        let mut purchases: Vec<&CardPurchase> = self
            .purchases
            .values()
            .filter(|purchase| card_id.map_or(true, |id| purchase.card_id == id))
            .collect();
        purchases.sort_by(|a, b| b.date.cmp(&a.date));
        purchases
    }

    pub fn update_purchase(&mut self, id: PurchaseId, patch: PurchasePatch) -> Result<CardPurchase> {
        if let Some(category_id) = patch.category_id {
            if !self.card_categories.contains_key(&category_id) {
                return Err(LedgerError::CategoryNotFound { id: category_id });
            }
        }
        let purchase = self
            .purchases
            .get_mut(&id)
            .ok_or(LedgerError::PurchaseNotFound { id })?;
        purchase.apply(patch)?;
        debug!(purchase_id = %id, "updated card purchase");
        Ok(purchase.clone())
    }

    pub fn remove_purchase(&mut self, id: PurchaseId) -> Result<CardPurchase> {
        let purchase = self
            .purchases
            .remove(&id)
            .ok_or(LedgerError::PurchaseNotFound { id })?;
        info!(purchase_id = %id, "removed card purchase");
        Ok(purchase)
    }

    // billing

    /// the card's bill for one month: installments due, totals, limit
    /// usage and due date
    pub fn card_bill(&self, card_id: CardId, month: Month) -> Result<CardBill> {
        let card = self.card(card_id)?;
        let purchases: Vec<CardPurchase> = self
            .purchases
            .values()
            .filter(|purchase| purchase.card_id == card_id)
            .cloned()
            .collect();
        CardBill::assemble(card, &purchases, month)
    }

    /// spending aggregate across purchases, optionally for one card
    pub fn card_summary(&self, card_id: Option<CardId>) -> CardSummary {
        let purchases: Vec<CardPurchase> = self.purchases.values().cloned().collect();
        CardSummary::aggregate(&purchases, &self.card_categories, &self.cards, card_id)
    }

    // cash categories

    pub fn create_category(&mut self, new: NewCategory) -> Result<Category> {
        new.validate()?;
        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
            color: new.color,
            kind: new.kind,
        };
        debug!(category_id = %category.id, name = %category.name, "created category");
        self.categories.insert(category.id, category.clone());
        Ok(category)
    }

    pub fn category(&self, id: CategoryId) -> Result<&Category> {
        self.categories
            .get(&id)
            .ok_or(LedgerError::CategoryNotFound { id })
    }

    /// categories sorted by name, optionally filtered by kind
    pub fn categories(&self, kind: Option<TransactionKind>) -> Vec<&Category> {
        let mut categories: Vec<&Category> = self
            .categories
            .values()
            .filter(|category| kind.map_or(true, |k| category.kind == k))
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        categories
    }

    pub fn update_category(&mut self, id: CategoryId, patch: CategoryPatch) -> Result<Category> {
        let category = self
            .categories
            .get_mut(&id)
            .ok_or(LedgerError::CategoryNotFound { id })?;
        category.apply(patch)?;
        Ok(category.clone())
    }

    pub fn remove_category(&mut self, id: CategoryId) -> Result<Category> {
        self.categories
            .remove(&id)
            .ok_or(LedgerError::CategoryNotFound { id })
    }

    // cash transactions

    pub fn create_transaction(&mut self, new: NewTransaction) -> Result<Transaction> {
        new.validate()?;
        if !self.categories.contains_key(&new.category_id) {
            return Err(LedgerError::CategoryNotFound {
                id: new.category_id,
            });
        }
        let transaction = Transaction {
            id: Uuid::new_v4(),
            date: new.date,
            amount: new.amount,
            kind: new.kind,
            description: new.description,
            category_id: new.category_id,
            created_at: self.time.now(),
        };
        info!(
            transaction_id = %transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "recorded transaction"
        );
        self.transactions.insert(transaction.id, transaction.clone());
        Ok(transaction)
    }

    pub fn transaction(&self, id: TransactionId) -> Result<&Transaction> {
        self.transactions
            .get(&id)
            .ok_or(LedgerError::TransactionNotFound { id })
    }

    /// filtered page of transactions, sorted by date descending
    pub fn transactions(&self, query: &TransactionQuery) -> Page<Transaction> {
        let mut matching: Vec<Transaction> = self
            .transactions
            .values()
            .filter(|transaction| query.matches(transaction))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.date.cmp(&a.date));
        Page::slice(matching, query.page, query.limit)
    }

    pub fn update_transaction(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction> {
        if let Some(category_id) = patch.category_id {
            if !self.categories.contains_key(&category_id) {
                return Err(LedgerError::CategoryNotFound { id: category_id });
            }
        }
        let transaction = self
            .transactions
            .get_mut(&id)
            .ok_or(LedgerError::TransactionNotFound { id })?;
        transaction.apply(patch)?;
        debug!(transaction_id = %id, "updated transaction");
        Ok(transaction.clone())
    }

    pub fn remove_transaction(&mut self, id: TransactionId) -> Result<Transaction> {
        let transaction = self
            .transactions
            .remove(&id)
            .ok_or(LedgerError::TransactionNotFound { id })?;
        info!(transaction_id = %id, "removed transaction");
        Ok(transaction)
    }

    /// income/expense aggregate under the same filters as the listing
    pub fn transaction_summary(&self, query: &TransactionQuery) -> TransactionSummary {
        let transactions: Vec<Transaction> = self.transactions.values().cloned().collect();
        TransactionSummary::aggregate(&transactions, &self.categories, query)
    }

    // budgets

    pub fn create_budget(&mut self, new: NewBudget) -> Result<Budget> {
        if self.budgets.contains_key(&(new.month, new.kind)) {
            return Err(LedgerError::DuplicateBudget {
                month: new.month,
                kind: new.kind,
            });
        }

        let amount = match new.kind {
            BudgetKind::IncomeBased => self.income_for(new.month),
            BudgetKind::FixedAmount => new.amount,
        };
        let now = self.time.now();
        let budget = Budget {
            id: Uuid::new_v4(),
            month: new.month,
            kind: new.kind,
            amount,
            created_at: now,
            updated_at: now,
        };
        info!(month = %budget.month, kind = %budget.kind, amount = %budget.amount, "created budget");
        self.budgets.insert((budget.month, budget.kind), budget.clone());
        Ok(budget)
    }

    /// all budgets, most recent month first
    pub fn budgets(&self) -> Vec<&Budget> {
        let mut budgets: Vec<&Budget> = self.budgets.values().collect();
        budgets.sort_by(|a, b| b.month.cmp(&a.month));
        budgets
    }

    /// the month's budget, whichever kind exists; income-based amounts
    /// are refreshed before being returned
    pub fn budget_for_month(&mut self, month: Month) -> Option<Budget> {
        let kind = self
            .budgets
            .range((month, BudgetKind::FixedAmount)..=(month, BudgetKind::IncomeBased))
            .map(|((_, kind), _)| *kind)
            .next()?;

        match kind {
            BudgetKind::IncomeBased => self.resolve_budget(month, kind).ok(),
            BudgetKind::FixedAmount => self.budgets.get(&(month, kind)).cloned(),
        }
    }

    /// resolve a budget amount: fixed budgets return the stored value,
    /// income-based budgets are recomputed from the month's income
    /// transactions and the refreshed amount is written back
    pub fn resolve_budget(&mut self, month: Month, kind: BudgetKind) -> Result<Budget> {
        if !self.budgets.contains_key(&(month, kind)) {
            return Err(LedgerError::BudgetNotFound { month });
        }

        if kind == BudgetKind::IncomeBased {
            let amount = self.income_for(month);
            let now = self.time.now();
            let budget = self
                .budgets
                .get_mut(&(month, kind))
                .ok_or(LedgerError::BudgetNotFound { month })?;
            if budget.amount != amount {
                debug!(month = %month, old = %budget.amount, new = %amount, "refreshed income budget");
            }
            budget.amount = amount;
            budget.updated_at = now;
        }

        self.budgets
            .get(&(month, kind))
            .cloned()
            .ok_or(LedgerError::BudgetNotFound { month })
    }

    /// update the month's budget. changing the kind replaces the row:
    /// the old (month, kind) row is deleted and a new one is created
    /// with a freshly computed amount
    pub fn update_budget(&mut self, month: Month, patch: BudgetPatch) -> Result<Budget> {
        let existing_kind = self
            .budgets
            .range((month, BudgetKind::FixedAmount)..=(month, BudgetKind::IncomeBased))
            .map(|((_, kind), _)| *kind)
            .next()
            .ok_or(LedgerError::BudgetNotFound { month })?;

        let now = self.time.now();

        if let Some(new_kind) = patch.kind.filter(|k| *k != existing_kind) {
            let old = self
                .budgets
                .remove(&(month, existing_kind))
                .ok_or(LedgerError::BudgetNotFound { month })?;
            let amount = match new_kind {
                BudgetKind::IncomeBased => self.income_for(month),
                BudgetKind::FixedAmount => patch.amount.unwrap_or(old.amount),
            };
            let budget = Budget {
                id: Uuid::new_v4(),
                month,
                kind: new_kind,
                amount,
                created_at: now,
                updated_at: now,
            };
            info!(month = %month, from = %existing_kind, to = %new_kind, "switched budget kind");
            self.budgets.insert((month, new_kind), budget.clone());
            return Ok(budget);
        }

        let amount = match existing_kind {
            BudgetKind::IncomeBased => self.income_for(month),
            BudgetKind::FixedAmount => patch
                .amount
                .or_else(|| {
                    self.budgets
                        .get(&(month, existing_kind))
                        .map(|budget| budget.amount)
                })
                .unwrap_or_default(),
        };
        let budget = self
            .budgets
            .get_mut(&(month, existing_kind))
            .ok_or(LedgerError::BudgetNotFound { month })?;
        budget.amount = amount;
        budget.updated_at = now;
        Ok(budget.clone())
    }

    pub fn remove_budget(&mut self, month: Month, kind: BudgetKind) -> Result<Budget> {
        let budget = self
            .budgets
            .remove(&(month, kind))
            .ok_or(LedgerError::BudgetNotFound { month })?;
        info!(month = %month, kind = %kind, "removed budget");
        Ok(budget)
    }

    fn income_for(&self, month: Month) -> Money {
        let transactions: Vec<Transaction> = self.transactions.values().cloned().collect();
        income_for_month(&transactions, month)
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
