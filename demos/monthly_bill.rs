/// monthly bill - a card with mixed purchases, billed month by month,
/// plus an income-based budget for the same period
use chrono::{TimeZone, Utc};
use finance_tracker_rs::{
    BudgetKind, Ledger, Money, NewBudget, NewCard, NewCardCategory, NewCategory, NewPurchase,
    NewTransaction, TransactionKind,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== monthly bill example ===\n");

    let mut ledger = Ledger::new();

    let card = ledger.create_card(NewCard {
        name: "Platinum".to_string(),
        limit: Money::from_major(5_000),
        closing_day: 25,
        due_day: 10,
        color: None,
    })?;

    let groceries = ledger.create_card_category(NewCardCategory {
        name: "Groceries".to_string(),
        color: Some("#16a34a".to_string()),
    })?;
    let travel = ledger.create_card_category(NewCardCategory {
        name: "Travel".to_string(),
        color: Some("#f59e0b".to_string()),
    })?;

    // single-installment purchase, hits january only
    ledger.add_purchase(NewPurchase {
        date: Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap(),
        amount: Money::from_major(120),
        description: Some("Weekly shop".to_string()),
        category_id: groceries.id,
        card_id: card.id,
        installments: None,
        current_installment: None,
    })?;

    // $1,200 flight in 6 installments, january through june
    ledger.add_purchase(NewPurchase {
        date: Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
        amount: Money::from_major(1_200),
        description: Some("Flights".to_string()),
        category_id: travel.id,
        card_id: card.id,
        installments: Some(6),
        current_installment: None,
    })?;

    for m in ["2024-01", "2024-02", "2024-06", "2024-07"] {
        let bill = ledger.card_bill(card.id, m.parse()?)?;
        println!(
            "{}: total ${} across {} item(s), due {}, limit usage {}%",
            m,
            bill.total_amount,
            bill.transaction_count,
            bill.due_date,
            bill.usage_percentage()
        );
    }

    // budget the same months from actual income
    let salary = ledger.create_category(NewCategory {
        name: "Salary".to_string(),
        color: None,
        kind: TransactionKind::Income,
    })?;
    ledger.create_transaction(NewTransaction {
        date: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
        amount: Money::from_major(4_500),
        kind: TransactionKind::Income,
        description: Some("January salary".to_string()),
        category_id: salary.id,
    })?;
    ledger.create_budget(NewBudget {
        month: "2024-01".parse()?,
        kind: BudgetKind::IncomeBased,
        amount: Money::ZERO,
    })?;

    let budget = ledger.resolve_budget("2024-01".parse()?, BudgetKind::IncomeBased)?;
    println!("\n2024-01 budget (income based): ${}", budget.amount);

    let summary = ledger.card_summary(Some(card.id));
    println!("\ncard summary:");
    println!("{}", summary.to_json_pretty());

    Ok(())
}
