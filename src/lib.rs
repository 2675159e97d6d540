pub mod billing;
pub mod budget;
pub mod cards;
pub mod decimal;
pub mod errors;
pub mod ledger;
pub mod month;
pub mod summary;
pub mod transactions;
pub mod types;

// re-export key types
pub use decimal::{Money, Rate};
pub use errors::{LedgerError, Result};
pub use billing::{occurrences, BillLine, CardBill, LimitUsage, Occurrence};
pub use budget::{income_for_month, Budget, BudgetPatch, NewBudget};
pub use cards::{
    CardCategory, CardCategoryPatch, CardPatch, CardPurchase, CreditCard, NewCard,
    NewCardCategory, NewPurchase, PurchasePatch,
};
pub use ledger::Ledger;
pub use month::Month;
pub use summary::{CardSummary, CardTotal, CategoryTotal, TransactionSummary};
pub use transactions::{
    Category, CategoryPatch, NewCategory, NewTransaction, Page, Pagination, Transaction,
    TransactionPatch, TransactionQuery,
};
pub use types::{
    BudgetId, BudgetKind, CardId, CategoryId, PurchaseId, TransactionId, TransactionKind,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
