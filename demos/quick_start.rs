/// quick start - minimal example to get started
use chrono::{TimeZone, Utc};
use finance_tracker_rs::{Ledger, Money, NewCard, NewCardCategory, NewPurchase};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut ledger = Ledger::new();

    // register a card with a $1,000 limit
    let card = ledger.create_card(NewCard {
        name: "Everyday".to_string(),
        limit: Money::from_major(1_000),
        closing_day: 25,
        due_day: 5,
        color: Some("#1d4ed8".to_string()),
    })?;

    let electronics = ledger.create_card_category(NewCardCategory {
        name: "Electronics".to_string(),
        color: None,
    })?;

    // a $300 purchase paid in 3 monthly installments
    ledger.add_purchase(NewPurchase {
        date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        amount: Money::from_major(300),
        description: Some("Headphones".to_string()),
        category_id: electronics.id,
        card_id: card.id,
        installments: Some(3),
        current_installment: None,
    })?;

    // february's bill carries the second installment
    let bill = ledger.card_bill(card.id, "2024-02".parse()?)?;
    println!("{}", bill.to_json_pretty());

    Ok(())
}
