use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::month::Month;
use crate::types::{CategoryId, TransactionId, TransactionKind};

/// typed category for cash transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: Option<String>,
    pub kind: TransactionKind,
}

/// category creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub color: Option<String>,
    pub kind: TransactionKind,
}

impl NewCategory {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::InvalidCardConfiguration {
                message: "category name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// partial category update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub kind: Option<TransactionKind>,
}

impl Category {
    pub fn apply(&mut self, patch: CategoryPatch) -> Result<()> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(LedgerError::InvalidCardConfiguration {
                    message: "category name must not be empty".to_string(),
                });
            }
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        Ok(())
    }
}

/// a cash income or expense entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
}

/// transaction entry request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub kind: TransactionKind,
    pub description: Option<String>,
    pub category_id: CategoryId,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidAmount {
                amount: self.amount,
            });
        }
        Ok(())
    }
}

/// partial transaction update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionPatch {
    pub date: Option<DateTime<Utc>>,
    pub amount: Option<Money>,
    pub kind: Option<TransactionKind>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
}

impl Transaction {
    pub fn apply(&mut self, patch: TransactionPatch) -> Result<()> {
        if let Some(amount) = patch.amount {
            if !amount.is_positive() {
                return Err(LedgerError::InvalidAmount { amount });
            }
            self.amount = amount;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        Ok(())
    }
}

/// listing filters; a month window takes precedence over explicit dates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionQuery {
    pub kind: Option<TransactionKind>,
    pub category_id: Option<CategoryId>,
    pub month: Option<Month>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl TransactionQuery {
    pub fn matches(&self, transaction: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if transaction.kind != kind {
                return false;
            }
        }
        if let Some(category_id) = self.category_id {
            if transaction.category_id != category_id {
                return false;
            }
        }
        if let Some(month) = self.month {
            return month.contains(transaction.date);
        }
        if let Some(start) = self.start_date {
            if transaction.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if transaction.date > end {
                return false;
            }
        }
        true
    }
}

const DEFAULT_PAGE_SIZE: u32 = 20;

/// one page of a listing plus navigation metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    /// slice a full result set into the requested page
    pub fn slice(items: Vec<T>, page: Option<u32>, limit: Option<u32>) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);
        let total = items.len();
        let total_pages = (total as u32).div_ceil(limit);

        let skip = ((page - 1) * limit) as usize;
        let data: Vec<T> = items
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .collect();

        Page {
            data,
            pagination: Pagination {
                page,
                limit,
                total,
                total_pages,
                has_next_page: page < total_pages,
                has_previous_page: page > 1,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn transaction(date: DateTime<Utc>, kind: TransactionKind) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            date,
            amount: Money::from_decimal(dec!(100.00)),
            kind,
            description: None,
            category_id: Uuid::new_v4(),
            created_at: date,
        }
    }

    #[test]
    fn test_query_month_filter() {
        let january = transaction(
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            TransactionKind::Income,
        );
        let february = transaction(
            Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap(),
            TransactionKind::Income,
        );

        let query = TransactionQuery {
            month: Some("2024-01".parse().unwrap()),
            ..Default::default()
        };
        assert!(query.matches(&january));
        assert!(!query.matches(&february));
    }

    #[test]
    fn test_query_month_overrides_dates() {
        let january = transaction(
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            TransactionKind::Expense,
        );

        // explicit dates would exclude it, but the month window wins
        let query = TransactionQuery {
            month: Some("2024-01".parse().unwrap()),
            start_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(query.matches(&january));
    }

    #[test]
    fn test_query_kind_and_dates() {
        let income = transaction(
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
            TransactionKind::Income,
        );

        let query = TransactionQuery {
            kind: Some(TransactionKind::Expense),
            ..Default::default()
        };
        assert!(!query.matches(&income));

        let query = TransactionQuery {
            start_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap()),
            ..Default::default()
        };
        assert!(query.matches(&income));
    }

    #[test]
    fn test_page_slice() {
        let items: Vec<u32> = (1..=45).collect();
        let page = Page::slice(items, Some(2), Some(20));

        assert_eq!(page.data.first(), Some(&21));
        assert_eq!(page.data.len(), 20);
        assert_eq!(page.pagination.total, 45);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_next_page);
        assert!(page.pagination.has_previous_page);
    }

    #[test]
    fn test_page_defaults_and_bounds() {
        let items: Vec<u32> = (1..=5).collect();
        let page = Page::slice(items, None, None);
        assert_eq!(page.pagination.page, 1);
        assert_eq!(page.pagination.limit, 20);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_next_page);
        assert!(!page.pagination.has_previous_page);

        let past_the_end = Page::slice((1..=5).collect::<Vec<u32>>(), Some(4), Some(2));
        assert!(past_the_end.data.is_empty());
        assert!(!past_the_end.pagination.has_next_page);
        assert!(past_the_end.pagination.has_previous_page);
    }
}
