pub mod installments;
pub mod statement;
pub mod usage;

pub use installments::{occurrences, Occurrence};
pub use statement::{BillLine, CardBill};
pub use usage::LimitUsage;
