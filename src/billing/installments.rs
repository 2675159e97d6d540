use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::CardPurchase;
use crate::decimal::Money;
use crate::month::{self, Month};
use crate::types::PurchaseId;

/// one installment of a purchase, due in a specific month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub purchase_id: PurchaseId,
    /// 1-based installment position
    pub index: u32,
    /// total installments of the originating purchase
    pub of: u32,
    pub due_date: DateTime<Utc>,
    pub due_month: Month,
    pub amount: Money,
}

impl Occurrence {
    pub fn is_installment(&self) -> bool {
        self.of > 1
    }
}

/// expand a purchase into its installment schedule, lazily.
///
/// a single-installment purchase yields one occurrence in its own month
/// for the full amount. a purchase in n installments yields n occurrences
/// in consecutive calendar months starting at the purchase month, each for
/// amount / n rounded to whole cents (remainder cents are not
/// redistributed).
pub fn occurrences(purchase: &CardPurchase) -> impl Iterator<Item = Occurrence> + '_ {
    let count = purchase.installments.max(1);
    let amount = purchase.amount.split(count);

    (0..count).map(move |i| {
        let due_date = month::add_months(purchase.date, i);
        Occurrence {
            purchase_id: purchase.id,
            index: i + 1,
            of: count,
            due_date,
            due_month: Month::containing(due_date),
            amount,
        }
    })
}
