use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{LedgerError, Result};
use crate::types::{CardId, CategoryId, PurchaseId};

/// credit card configuration: limit and billing-cycle days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CardId,
    pub name: String,
    pub limit: Money,
    /// day the billing cycle closes (1-31), stored configuration
    pub closing_day: u8,
    /// day the bill is due (1-31)
    pub due_day: u8,
    pub color: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditCard {
    /// apply a partial update, validating each provided field
    pub fn apply(&mut self, patch: CardPatch) -> Result<()> {
        if let Some(name) = patch.name {
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(limit) = patch.limit {
            validate_limit(limit)?;
            self.limit = limit;
        }
        if let Some(day) = patch.closing_day {
            validate_day(day)?;
            self.closing_day = day;
        }
        if let Some(day) = patch.due_day {
            validate_day(day)?;
            self.due_day = day;
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        Ok(())
    }
}

/// card creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCard {
    pub name: String,
    pub limit: Money,
    pub closing_day: u8,
    pub due_day: u8,
    pub color: Option<String>,
}

impl NewCard {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_limit(self.limit)?;
        validate_day(self.closing_day)?;
        validate_day(self.due_day)?;
        Ok(())
    }
}

/// partial card update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardPatch {
    pub name: Option<String>,
    pub limit: Option<Money>,
    pub closing_day: Option<u8>,
    pub due_day: Option<u8>,
    pub color: Option<String>,
    pub active: Option<bool>,
}

/// flat label for card purchases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardCategory {
    pub id: CategoryId,
    pub name: String,
    pub color: Option<String>,
}

impl CardCategory {
    pub fn apply(&mut self, patch: CardCategoryPatch) -> Result<()> {
        if let Some(name) = patch.name {
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
        Ok(())
    }
}

/// card category creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCardCategory {
    pub name: String,
    pub color: Option<String>,
}

impl NewCardCategory {
    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)
    }
}

/// partial card category update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CardCategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// a purchase made on a credit card, possibly paid in installments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPurchase {
    pub id: PurchaseId,
    pub date: DateTime<Utc>,
    /// total purchase amount, regardless of installment schedule
    pub amount: Money,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub card_id: CardId,
    /// number of monthly installments, at least 1
    pub installments: u32,
    /// user-recorded installment position; informational only,
    /// the billing schedule is derived from the purchase date
    pub current_installment: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl CardPurchase {
    /// apply a partial update, validating each provided field
    pub fn apply(&mut self, patch: PurchasePatch) -> Result<()> {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
            self.amount = amount;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(installments) = patch.installments {
            validate_installments(installments)?;
            self.installments = installments;
        }
        if let Some(current) = patch.current_installment {
            self.current_installment = Some(current);
        }
        Ok(())
    }
}

/// purchase entry request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPurchase {
    pub date: DateTime<Utc>,
    pub amount: Money,
    pub description: Option<String>,
    pub category_id: CategoryId,
    pub card_id: CardId,
    /// defaults to a single installment when absent
    pub installments: Option<u32>,
    pub current_installment: Option<u32>,
}

impl NewPurchase {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        if let Some(installments) = self.installments {
            validate_installments(installments)?;
        }
        Ok(())
    }
}

/// partial purchase update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchasePatch {
    pub date: Option<DateTime<Utc>>,
    pub amount: Option<Money>,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub installments: Option<u32>,
    pub current_installment: Option<u32>,
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::InvalidCardConfiguration {
            message: "name must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_limit(limit: Money) -> Result<()> {
    if !limit.is_positive() {
        return Err(LedgerError::InvalidCardConfiguration {
            message: format!("credit limit must be positive, got {limit}"),
        });
    }
    Ok(())
}

fn validate_day(day: u8) -> Result<()> {
    if !(1..=31).contains(&day) {
        return Err(LedgerError::InvalidDayOfMonth { day });
    }
    Ok(())
}

fn validate_amount(amount: Money) -> Result<()> {
    if !amount.is_positive() {
        return Err(LedgerError::InvalidAmount { amount });
    }
    Ok(())
}

fn validate_installments(count: u32) -> Result<()> {
    if count < 1 {
        return Err(LedgerError::InvalidInstallments { count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn valid_card() -> NewCard {
        NewCard {
            name: "Platinum".to_string(),
            limit: Money::from_major(5_000),
            closing_day: 25,
            due_day: 5,
            color: Some("#1d4ed8".to_string()),
        }
    }

    #[test]
    fn test_new_card_validation() {
        assert!(valid_card().validate().is_ok());

        let mut card = valid_card();
        card.limit = Money::ZERO;
        assert!(matches!(
            card.validate(),
            Err(LedgerError::InvalidCardConfiguration { .. })
        ));

        let mut card = valid_card();
        card.due_day = 32;
        assert!(matches!(
            card.validate(),
            Err(LedgerError::InvalidDayOfMonth { day: 32 })
        ));

        let mut card = valid_card();
        card.closing_day = 0;
        assert!(card.validate().is_err());

        let mut card = valid_card();
        card.name = "  ".to_string();
        assert!(card.validate().is_err());
    }

    #[test]
    fn test_card_patch_validates_fields() {
        let mut card = CreditCard {
            id: Uuid::new_v4(),
            name: "Gold".to_string(),
            limit: Money::from_major(1_000),
            closing_day: 20,
            due_day: 1,
            color: None,
            active: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        };

        card.apply(CardPatch {
            limit: Some(Money::from_major(2_000)),
            due_day: Some(10),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(card.limit, Money::from_major(2_000));
        assert_eq!(card.due_day, 10);
        assert_eq!(card.name, "Gold");

        let err = card.apply(CardPatch {
            limit: Some(Money::from_decimal(dec!(-5))),
            ..Default::default()
        });
        assert!(err.is_err());
        // failed patch left the card untouched
        assert_eq!(card.limit, Money::from_major(2_000));
    }

    #[test]
    fn test_new_purchase_validation() {
        let purchase = NewPurchase {
            date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            amount: Money::from_decimal(dec!(300.00)),
            description: None,
            category_id: Uuid::new_v4(),
            card_id: Uuid::new_v4(),
            installments: Some(3),
            current_installment: None,
        };
        assert!(purchase.validate().is_ok());

        let mut bad = purchase.clone();
        bad.amount = Money::ZERO;
        assert!(matches!(bad.validate(), Err(LedgerError::InvalidAmount { .. })));

        let mut bad = purchase;
        bad.installments = Some(0);
        assert!(matches!(
            bad.validate(),
            Err(LedgerError::InvalidInstallments { count: 0 })
        ));
    }
}
