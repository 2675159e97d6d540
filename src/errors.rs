use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::month::Month;
use crate::types::BudgetKind;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("card not found: {id}")]
    CardNotFound {
        id: Uuid,
    },

    #[error("category not found: {id}")]
    CategoryNotFound {
        id: Uuid,
    },

    #[error("transaction not found: {id}")]
    TransactionNotFound {
        id: Uuid,
    },

    #[error("purchase not found: {id}")]
    PurchaseNotFound {
        id: Uuid,
    },

    #[error("budget not found for {month}")]
    BudgetNotFound {
        month: Month,
    },

    #[error("budget already exists for {month} ({kind})")]
    DuplicateBudget {
        month: Month,
        kind: BudgetKind,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("invalid installment count: {count}")]
    InvalidInstallments {
        count: u32,
    },

    #[error("invalid month string: {input}")]
    InvalidMonth {
        input: String,
    },

    #[error("invalid day of month: {day}")]
    InvalidDayOfMonth {
        day: u8,
    },

    #[error("invalid card configuration: {message}")]
    InvalidCardConfiguration {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, LedgerError>;
