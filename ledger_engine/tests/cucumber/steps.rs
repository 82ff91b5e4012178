use std::str::FromStr;

use chrono::Duration;
use cucumber::{given, then, when};
use ledger_common::Money;
use ledger_engine::{LedgerError, OrderMutation};

use crate::cucumber::LedgerWorld;

#[given(expr = "a partner '{word}' with a revenue share of {float}")]
async fn partner(world: &mut LedgerWorld, name: String, share: f64) {
    let email = format!("{name}@example.test");
    let partner = world.system().await.add_partner(&email, share).await;
    world.partners.insert(name, partner.id);
}

#[given(expr = "an order '{word}' for partner '{word}' with fees of {int} and base charges of {int}")]
async fn order(world: &mut LedgerWorld, name: String, partner: String, fees: i64, base_charges: i64) {
    let partner_id = world.partner_id(&partner);
    let order = world.system().await.add_order(partner_id, fees, base_charges).await;
    world.orders.insert(name, order.id);
}

#[given(expr = "order '{word}' has an expense of {int}")]
async fn expense(world: &mut LedgerWorld, name: String, amount: i64) {
    let id = world.order_id(&name);
    world.system().await.add_expenses(id, &[amount]).await;
}

#[given(expr = "order '{word}' has a receipt of {int}")]
async fn receipt(world: &mut LedgerWorld, name: String, amount: i64) {
    let id = world.order_id(&name);
    world.system().await.add_receipt(id, amount).await;
}

#[when(expr = "order '{word}' moves to {string}")]
async fn move_to_status(world: &mut LedgerWorld, name: String, status: String) {
    let id = world.order_id(&name);
    let result = world.system().await.set_status(id, &status).await;
    world.last_error = result.err();
}

#[when(expr = "order '{word}' is marked as paid")]
async fn mark_paid(world: &mut LedgerWorld, name: String) {
    let id = world.order_id(&name);
    let result = world.system().await.set_paid(id, true).await;
    world.last_error = result.err();
}

#[when(expr = "order '{word}' is marked as unpaid")]
async fn mark_unpaid(world: &mut LedgerWorld, name: String) {
    let id = world.order_id(&name);
    let result = world.system().await.set_paid(id, false).await;
    world.last_error = result.err();
}

#[when(expr = "the fees of order '{word}' change to {int}")]
async fn change_fees(world: &mut LedgerWorld, name: String, fees: i64) {
    let id = world.order_id(&name);
    let mutation = OrderMutation::default().with_new_fees(Money::from_major(fees));
    let result = world.system().await.orders.submit_order_mutation(id, mutation).await;
    world.last_error = result.err();
}

#[when(expr = "partner '{word}' is misconfigured with a revenue share of {float}")]
async fn corrupt_partner(world: &mut LedgerWorld, name: String, share: f64) {
    let id = world.partner_id(&name);
    let system = world.system().await;
    sqlx::query("UPDATE partners SET revenue_share = $1 WHERE id = $2")
        .bind(share)
        .bind(id)
        .execute(system.db.pool())
        .await
        .expect("Error corrupting partner");
}

#[when(expr = "{int} minutes pass")]
async fn time_passes(world: &mut LedgerWorld, minutes: i64) {
    world.system().await.clock.advance(Duration::minutes(minutes));
}

#[then(expr = "order '{word}' has {int} settlement(s)")]
async fn settlement_count(world: &mut LedgerWorld, name: String, count: usize) {
    let id = world.order_id(&name);
    let ledger = world.system().await.orders.get_order(id).await.expect("Error fetching order");
    assert_eq!(ledger.settlements.len(), count, "Unexpected number of settlements");
}

#[then(expr = "settlement {int} of order '{word}' pays the partner {word} and keeps {word}")]
async fn settlement_amounts(world: &mut LedgerWorld, n: usize, name: String, partner: String, kept: String) {
    let id = world.order_id(&name);
    let ledger = world.system().await.orders.get_order(id).await.expect("Error fetching order");
    let settlement = ledger.settlements.get(n - 1).unwrap_or_else(|| panic!("No settlement #{n} for order {name}"));
    let partner = Money::from_str(&partner).expect("Not a valid amount");
    let kept = Money::from_str(&kept).expect("Not a valid amount");
    assert_eq!(settlement.partner_amount, partner, "Partner amount is incorrect");
    assert_eq!(settlement.self_amount, kept, "Retained amount is incorrect");
}

#[then(expr = "order '{word}' is settled")]
async fn is_settled(world: &mut LedgerWorld, name: String) {
    let id = world.order_id(&name);
    let ledger = world.system().await.orders.get_order(id).await.expect("Error fetching order");
    assert!(ledger.order.settlement_status, "Order should be settled");
}

#[then(expr = "order '{word}' is not settled")]
async fn is_not_settled(world: &mut LedgerWorld, name: String) {
    let id = world.order_id(&name);
    let ledger = world.system().await.orders.get_order(id).await.expect("Error fetching order");
    assert!(!ledger.order.settlement_status, "Order should not be settled");
}

#[then(expr = "order '{word}' has status {string}")]
async fn has_status(world: &mut LedgerWorld, name: String, status: String) {
    let id = world.order_id(&name);
    let system = world.system().await;
    let expected = system.status(&status);
    let ledger = system.orders.get_order(id).await.expect("Error fetching order");
    assert_eq!(ledger.order.status_id, expected, "Order has the wrong status");
}

#[then(expr = "the change is rejected with a data integrity error")]
async fn data_integrity_error(world: &mut LedgerWorld) {
    match world.last_error.take() {
        Some(LedgerError::DataIntegrity(_)) => {},
        other => panic!("Expected a data integrity error, got {other:?}"),
    }
}

#[then(expr = "the change succeeds")]
async fn change_succeeds(world: &mut LedgerWorld) {
    if let Some(e) = world.last_error.take() {
        panic!("Expected the change to succeed, but it failed with {e}");
    }
}
