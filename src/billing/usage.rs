use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cards::{CardPurchase, CreditCard};
use crate::decimal::{Money, Rate};
use crate::errors::{LedgerError, Result};

/// all-time credit utilization for one card.
///
/// used limit is the full original amount of every purchase, once per
/// purchase: an installment schedule spreads the bill, not the limit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LimitUsage {
    pub total_used: Money,
    pub utilization: Rate,
}

impl LimitUsage {
    /// accumulate usage over every purchase on the card, no date filter
    pub fn compute(card: &CreditCard, purchases: &[CardPurchase]) -> Result<Self> {
        if !card.limit.is_positive() {
            return Err(LedgerError::InvalidCardConfiguration {
                message: format!("card {} has a non-positive limit", card.id),
            });
        }

        let total_used: Money = purchases.iter().map(|p| p.amount).sum();
        let utilization = if total_used.is_zero() {
            Rate::ZERO
        } else {
            Rate::ratio(total_used, card.limit)
        };

        Ok(Self {
            total_used,
            utilization,
        })
    }

    pub fn usage_percentage(&self) -> Decimal {
        self.utilization.as_percentage()
    }
}
