use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::billing::installments::occurrences;
use crate::billing::usage::LimitUsage;
use crate::cards::{CardPurchase, CreditCard};
use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::month::Month;
use crate::types::{CardId, CategoryId, PurchaseId};

/// one line of a monthly bill: a purchase or one installment of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillLine {
    pub purchase_id: PurchaseId,
    pub description: Option<String>,
    pub category_id: CategoryId,
    /// the date this line is billed under: the installment due date,
    /// which for a single-installment purchase is the purchase date
    pub date: DateTime<Utc>,
    pub purchase_date: DateTime<Utc>,
    pub amount: Money,
    /// 1-based installment position
    pub installment: u32,
    pub installments: u32,
}

impl BillLine {
    pub fn is_installment(&self) -> bool {
        self.installments > 1
    }
}

/// a card's bill for one calendar month, with limit-usage context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardBill {
    pub card_id: CardId,
    pub card_name: String,
    pub limit: Money,
    pub month: Month,
    /// sum of the lines due this month only
    pub total_amount: Money,
    /// all-time outstanding purchase principal, month-independent
    pub total_used_limit: Money,
    pub utilization: Rate,
    pub due_date: NaiveDate,
    pub transaction_count: usize,
    pub lines: Vec<BillLine>,
}

impl CardBill {
    /// assemble the bill for a card and target month from the card's
    /// full purchase history
    pub fn assemble(card: &CreditCard, purchases: &[CardPurchase], month: Month) -> Result<Self> {
        let usage = LimitUsage::compute(card, purchases)?;

        let mut lines: Vec<BillLine> = purchases
            .iter()
            .flat_map(|purchase| {
                occurrences(purchase)
                    .filter(|occurrence| occurrence.due_month == month)
                    .map(|occurrence| BillLine {
                        purchase_id: purchase.id,
                        description: purchase.description.clone(),
                        category_id: purchase.category_id,
                        date: occurrence.due_date,
                        purchase_date: purchase.date,
                        amount: occurrence.amount,
                        installment: occurrence.index,
                        installments: occurrence.of,
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        lines.sort_by(|a, b| b.date.cmp(&a.date));

        let total_amount: Money = lines.iter().map(|line| line.amount).sum();

        Ok(CardBill {
            card_id: card.id,
            card_name: card.name.clone(),
            limit: card.limit,
            month,
            total_amount,
            total_used_limit: usage.total_used,
            utilization: usage.utilization,
            due_date: due_date_for(card.due_day, month),
            transaction_count: lines.len(),
            lines,
        })
    }

    pub fn usage_percentage(&self) -> rust_decimal::Decimal {
        self.utilization.as_percentage()
    }

    /// get json representation of the bill
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("JSON error: {e}"))
    }
}

/// the bill's due day lands in the target month; a due day before the
/// month's last day belongs to the next cycle and rolls forward one month
fn due_date_for(due_day: u8, month: Month) -> NaiveDate {
    let candidate = month.date_clamped(due_day);
    if candidate < month.last_day() {
        month.plus_months(1).date_clamped(due_day)
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn card(limit: Money, due_day: u8) -> CreditCard {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        CreditCard {
            id: Uuid::new_v4(),
            name: "Everyday".to_string(),
            limit,
            closing_day: 25,
            due_day,
            color: None,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn purchase(
        card_id: Uuid,
        date: DateTime<Utc>,
        amount: Money,
        installments: u32,
    ) -> CardPurchase {
        CardPurchase {
            id: Uuid::new_v4(),
            date,
            amount,
            description: None,
            category_id: Uuid::new_v4(),
            card_id,
            installments,
            current_installment: None,
            created_at: date,
        }
    }

    fn month(s: &str) -> Month {
        s.parse().unwrap()
    }

    #[test]
    fn test_bill_keeps_only_the_target_month() {
        let card = card(Money::from_major(1_000), 10);
        let purchases = vec![purchase(
            card.id,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            Money::from_major(300),
            3,
        )];

        let bill = CardBill::assemble(&card, &purchases, month("2024-02")).unwrap();
        assert_eq!(bill.total_amount, Money::from_major(100));
        assert_eq!(bill.transaction_count, 1);
        assert_eq!(bill.lines[0].installment, 2);
        assert_eq!(bill.lines[0].installments, 3);
        // used limit is the full purchase principal, not this month's share
        assert_eq!(bill.total_used_limit, Money::from_major(300));
        assert_eq!(bill.usage_percentage(), dec!(30));
    }

    #[test]
    fn test_used_limit_is_invariant_to_the_query_month() {
        let card = card(Money::from_major(1_000), 10);
        let purchases = vec![purchase(
            card.id,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            Money::from_major(300),
            3,
        )];

        for target in ["2024-01", "2024-02", "2024-03", "2024-07"] {
            let bill = CardBill::assemble(&card, &purchases, month(target)).unwrap();
            assert_eq!(bill.total_used_limit, Money::from_major(300));
        }
    }

    #[test]
    fn test_empty_card_yields_empty_bill() {
        let card = card(Money::from_major(1_000), 10);
        let bill = CardBill::assemble(&card, &[], month("2024-02")).unwrap();
        assert_eq!(bill.total_amount, Money::ZERO);
        assert_eq!(bill.total_used_limit, Money::ZERO);
        assert_eq!(bill.usage_percentage(), dec!(0));
        assert_eq!(bill.transaction_count, 0);
        assert!(bill.lines.is_empty());
    }

    #[test]
    fn test_lines_sorted_descending_by_billed_date() {
        let card = card(Money::from_major(5_000), 10);
        let single_late = purchase(
            card.id,
            Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap(),
            Money::from_major(50),
            1,
        );
        let single_early = purchase(
            card.id,
            Utc.with_ymd_and_hms(2024, 2, 3, 0, 0, 0).unwrap(),
            Money::from_major(80),
            1,
        );
        // second installment lands on 2024-02-10
        let installment = purchase(
            card.id,
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap(),
            Money::from_major(200),
            2,
        );
        let purchases = vec![single_early.clone(), installment.clone(), single_late.clone()];

        let bill = CardBill::assemble(&card, &purchases, month("2024-02")).unwrap();
        let order: Vec<Uuid> = bill.lines.iter().map(|l| l.purchase_id).collect();
        assert_eq!(order, vec![single_late.id, installment.id, single_early.id]);
        assert_eq!(bill.total_amount, Money::from_major(230));
    }

    #[test]
    fn test_mixed_single_and_installment_totals() {
        let card = card(Money::from_major(2_000), 15);
        let purchases = vec![
            purchase(
                card.id,
                Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap(),
                Money::from_decimal(dec!(120.50)),
                1,
            ),
            purchase(
                card.id,
                Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
                Money::from_major(600),
                6,
            ),
        ];

        let bill = CardBill::assemble(&card, &purchases, month("2024-03")).unwrap();
        assert_eq!(bill.total_amount, Money::from_decimal(dec!(220.50)));
        assert_eq!(bill.transaction_count, 2);
        // both purchases count in full against the limit
        assert_eq!(bill.total_used_limit, Money::from_decimal(dec!(720.50)));
    }

    #[test]
    fn test_due_date_rolls_into_the_following_month() {
        let card = card(Money::from_major(1_000), 10);
        let bill = CardBill::assemble(&card, &[], month("2024-02")).unwrap();
        // the 10th is before february's last day, so the bill is due in march
        assert_eq!(bill.due_date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn test_due_date_on_last_day_stays_in_month() {
        let card = card(Money::from_major(1_000), 31);
        let bill = CardBill::assemble(&card, &[], month("2024-01")).unwrap();
        assert_eq!(bill.due_date, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        // day 31 clamps to february's length and still counts as the last day
        let bill = CardBill::assemble(&card, &[], month("2024-02")).unwrap();
        assert_eq!(bill.due_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_assembly_is_idempotent() {
        let card = card(Money::from_major(1_000), 5);
        let purchases = vec![purchase(
            card.id,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            Money::from_major(300),
            3,
        )];

        let first = CardBill::assemble(&card, &purchases, month("2024-02")).unwrap();
        let second = CardBill::assemble(&card, &purchases, month("2024-02")).unwrap();
        assert_eq!(first, second);
    }
}
