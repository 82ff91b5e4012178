use chrono::Duration;
use ledger_common::Money;
use ledger_engine::{
    db_types::{NewLedgerEntry, NewOrder, NewOrderDocument},
    events::EventProducers,
    Clock,
    LedgerError,
    OrderFlowApi,
    OrderMutation,
    ValidationError,
};
use support::fixtures::{start_time, LedgerFixture};

mod support;

fn m(units: i64) -> Money {
    Money::from_major(units)
}

#[tokio::test]
async fn completed_order_splits_net_fees() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("p2@example.test", 0.4).await;
    let order = fx.add_order(partner.id, 1000, 0).await;
    fx.add_expenses(order.id, &[200, 100]).await;
    // Receipts are not part of the formula
    fx.add_receipt(order.id, 5000).await;
    fx.set_status(order.id, "Completed").await.unwrap();

    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(ledger.settlements.len(), 1);
    let s = &ledger.settlements[0];
    assert_eq!(s.partner_id, partner.id);
    assert_eq!(s.partner_amount, m(280));
    assert_eq!(s.self_amount, m(420));
    assert_eq!(s.created_at, start_time());
    assert_eq!(ledger.total_receipts(), Some(m(5000)));
    assert_eq!(ledger.total_expenses(), Some(m(300)));
    fx.tear_down().await;
}

#[tokio::test]
async fn failed_order_with_expenses_below_base_charges() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("p3@example.test", 0.3).await;
    let order = fx.add_order(partner.id, 2000, 500).await;
    fx.add_expenses(order.id, &[100]).await;
    fx.set_status(order.id, "Failed").await.unwrap();

    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(ledger.settlements.len(), 1);
    assert_eq!(ledger.settlements[0].partner_amount, m(120));
    assert_eq!(ledger.settlements[0].self_amount, m(0));
    fx.tear_down().await;
}

#[tokio::test]
async fn failed_order_with_expenses_above_base_charges_books_a_loss() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("p4@example.test", 0.3).await;
    let order = fx.add_order(partner.id, 2000, 500).await;
    fx.add_expenses(order.id, &[800]).await;
    fx.set_status(order.id, "Failed").await.unwrap();

    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(ledger.settlements.len(), 1);
    assert_eq!(ledger.settlements[0].partner_amount, m(150));
    assert_eq!(ledger.settlements[0].self_amount, m(-210));
    fx.tear_down().await;
}

#[tokio::test]
async fn writing_the_same_status_again_does_not_settle_twice() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("p1@example.test", 0.5).await;
    let order = fx.add_order(partner.id, 100, 0).await;
    fx.set_status(order.id, "Completed").await.unwrap();
    fx.set_status(order.id, "Completed").await.unwrap();
    // A change to another field with the status restated is still not a status change
    let mutation =
        OrderMutation::default().with_new_status(fx.status("Completed")).with_new_fees(m(150));
    let order = fx.orders.submit_order_mutation(order.id, mutation).await.unwrap();
    assert_eq!(order.fees, m(150));

    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(ledger.settlements.len(), 1);
    assert_eq!(ledger.settlements[0].partner_amount, m(50));
    fx.tear_down().await;
}

#[tokio::test]
async fn non_terminal_statuses_do_not_settle() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("p6@example.test", 0.5).await;
    let order = fx.add_order(partner.id, 100, 50).await;
    fx.set_status(order.id, "In Progress").await.unwrap();
    fx.set_status(order.id, "New").await.unwrap();
    assert!(fx.orders.get_order(order.id).await.unwrap().settlements.is_empty());
    fx.tear_down().await;
}

#[tokio::test]
async fn payment_flag_only_ever_sets_settlement_status() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("p5@example.test", 0.5).await;
    let order = fx.add_order(partner.id, 100, 50).await;
    assert!(!order.settlement_status);

    let order = fx.set_paid(order.id, true).await.unwrap();
    assert!(order.payment_status);
    assert!(order.settlement_status);

    let order = fx.set_paid(order.id, false).await.unwrap();
    assert!(!order.payment_status);
    assert!(order.settlement_status);

    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert!(ledger.order.settlement_status);
    assert!(ledger.settlements.is_empty());
    fx.tear_down().await;
}

#[tokio::test]
async fn every_terminal_transition_is_settled_from_the_state_at_that_time() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("p7@example.test", 0.4).await;
    let order = fx.add_order(partner.id, 1000, 500).await;
    fx.add_expenses(order.id, &[200, 100]).await;
    fx.set_status(order.id, "Completed").await.unwrap();

    fx.clock.advance(Duration::hours(1));
    fx.set_status(order.id, "In Progress").await.unwrap();
    fx.add_expenses(order.id, &[100]).await;
    fx.set_status(order.id, "Failed").await.unwrap();

    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(ledger.settlements.len(), 2);
    let (first, second) = (&ledger.settlements[0], &ledger.settlements[1]);
    assert_eq!((first.partner_amount, first.self_amount), (m(280), m(420)));
    assert_eq!(first.created_at, start_time());
    // Failed with expenses (400) below base charges (500)
    assert_eq!((second.partner_amount, second.self_amount), (m(40), m(0)));
    assert_eq!(second.created_at, fx.clock.now());
    assert_eq!(ledger.latest_settlement(), Some(second));
    fx.tear_down().await;
}

#[tokio::test]
async fn different_orders_settle_independently() {
    let fx = LedgerFixture::new().await;
    let alice = fx.add_partner("alice@example.test", 0.4).await;
    let bob = fx.add_partner("bob@example.test", 0.3).await;
    let a = fx.add_order(alice.id, 1000, 0).await;
    let b = fx.add_order(bob.id, 0, 500).await;
    fx.add_expenses(a.id, &[200, 100]).await;
    fx.add_expenses(b.id, &[800]).await;

    let (ra, rb) = tokio::join!(fx.set_status(a.id, "Completed"), fx.set_status(b.id, "Failed"));
    ra.unwrap();
    rb.unwrap();

    let sa = fx.orders.get_order(a.id).await.unwrap().settlements;
    let sb = fx.orders.get_order(b.id).await.unwrap().settlements;
    assert_eq!((sa.len(), sb.len()), (1, 1));
    assert_eq!((sa[0].partner_amount, sa[0].self_amount), (m(280), m(420)));
    assert_eq!((sb[0].partner_amount, sb[0].self_amount), (m(150), m(-210)));
    fx.tear_down().await;
}

#[tokio::test]
async fn racing_completions_of_one_order_settle_once() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("race@example.test", 0.5).await;
    let order = fx.add_order(partner.id, 100, 0).await;
    let (r1, r2) = tokio::join!(fx.set_status(order.id, "Completed"), fx.set_status(order.id, "Completed"));
    r1.unwrap();
    r2.unwrap();
    assert_eq!(fx.orders.get_order(order.id).await.unwrap().settlements.len(), 1);
    fx.tear_down().await;
}

#[tokio::test]
async fn separate_apis_on_one_database_serialize_on_the_write_lock() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("writers@example.test", 0.5).await;
    let order = fx.add_order(partner.id, 100, 0).await;
    // No shared OrderLocks between these two
    let first = OrderFlowApi::new(fx.db.clone(), fx.clock.clone(), EventProducers::default());
    let second = OrderFlowApi::new(fx.db.clone(), fx.clock.clone(), EventProducers::default());
    let completed = || OrderMutation::default().with_new_status(fx.status("Completed"));
    let rounds = 10;
    for _ in 0..rounds {
        let (r1, r2) = tokio::join!(
            first.submit_order_mutation(order.id, completed()),
            second.submit_order_mutation(order.id, completed())
        );
        r1.unwrap();
        r2.unwrap();
        fx.set_status(order.id, "New").await.unwrap();
    }
    assert_eq!(fx.orders.get_order(order.id).await.unwrap().settlements.len(), rounds);

    // Changes to different fields from both writers must both land
    let (r1, r2) = tokio::join!(
        first.submit_order_mutation(order.id, OrderMutation::default().with_new_fees(m(300))),
        second.submit_order_mutation(order.id, completed())
    );
    r1.unwrap();
    r2.unwrap();
    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(ledger.order.fees, m(300));
    assert_eq!(ledger.order.status_id, fx.status("Completed"));
    assert_eq!(ledger.settlements.len(), rounds + 1);
    fx.tear_down().await;
}

#[tokio::test]
async fn expense_totals_that_overflow_are_rejected() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("huge@example.test", 0.5).await;
    let order = fx.add_order(partner.id, 100, 0).await;
    for _ in 0..2 {
        let entry = NewLedgerEntry::new(order.id, Money::from(i64::MAX / 2 + 1));
        fx.orders.add_expense(entry).await.unwrap();
    }

    let err = fx.set_status(order.id, "Completed").await.unwrap_err();
    assert!(matches!(err, LedgerError::DataIntegrity(_)), "{err:?}");

    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(ledger.order.status_id, fx.status("New"));
    assert!(ledger.settlements.is_empty());
    assert_eq!(ledger.total_expenses(), None);
    fx.tear_down().await;
}

#[tokio::test]
async fn misconfigured_partner_fails_the_status_change() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("broken@example.test", 0.5).await;
    let order = fx.add_order(partner.id, 100, 0).await;
    sqlx::query("UPDATE partners SET revenue_share = 1.5 WHERE id = $1")
        .bind(partner.id)
        .execute(fx.db.pool())
        .await
        .unwrap();

    let err = fx.set_status(order.id, "Completed").await.unwrap_err();
    assert!(matches!(err, LedgerError::DataIntegrity(_)), "{err:?}");

    let ledger = fx.orders.get_order(order.id).await.unwrap();
    assert_eq!(ledger.order.status_id, fx.status("New"));
    assert!(ledger.settlements.is_empty());
    fx.tear_down().await;
}

#[tokio::test]
async fn orders_are_validated_before_anything_is_written() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("v@example.test", 0.5).await;

    let missing_partner = NewOrder { partner_id: None, ..NewOrder::new(fx.client_id, 0, fx.order_type_id, fx.company_id, 1) };
    let err = fx.orders.create_order(missing_partner).await.unwrap_err();
    assert_eq!(err, LedgerError::Validation(ValidationError::MissingField("partner")));

    let unknown_partner = NewOrder::new(fx.client_id, 999, fx.order_type_id, fx.company_id, fx.status("New"));
    let err = fx.orders.create_order(unknown_partner).await.unwrap_err();
    assert_eq!(err, LedgerError::Validation(ValidationError::UnknownReference { entity: "partner", id: 999 }));

    let negative = NewOrder::new(fx.client_id, partner.id, fx.order_type_id, fx.company_id, fx.status("New"))
        .with_fees(Money::from(-1));
    let err = fx.orders.create_order(negative).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(ValidationError::NegativeAmount { field: "fees", .. })));

    let order = fx.add_order(partner.id, 100, 0).await;
    assert_eq!(order.id, 1, "Rejected orders must not consume an id");

    let err = fx.orders.submit_order_mutation(order.id, OrderMutation::default()).await.unwrap_err();
    assert_eq!(err, LedgerError::Validation(ValidationError::EmptyMutation));

    let err = fx.orders.submit_order_mutation(order.id, OrderMutation::default().with_new_status(999)).await.unwrap_err();
    assert_eq!(err, LedgerError::Validation(ValidationError::UnknownReference { entity: "status", id: 999 }));

    let err = fx.orders.add_expense(NewLedgerEntry::new(order.id, Money::from(-100))).await.unwrap_err();
    assert!(matches!(err, LedgerError::Validation(ValidationError::NegativeAmount { field: "amount", .. })));

    let err = fx.orders.add_receipt(NewLedgerEntry::new(404, m(1))).await.unwrap_err();
    assert_eq!(err, LedgerError::OrderNotFound(404));

    let err = fx.set_status(404, "Completed").await.unwrap_err();
    assert_eq!(err, LedgerError::OrderNotFound(404));
    fx.tear_down().await;
}

#[tokio::test]
async fn deleting_an_order_removes_everything_it_owns() {
    let fx = LedgerFixture::new().await;
    let partner = fx.add_partner("del@example.test", 0.5).await;
    let order = fx.add_order(partner.id, 100, 0).await;
    fx.add_expenses(order.id, &[10]).await;
    fx.add_receipt(order.id, 100).await;
    fx.set_status(order.id, "Completed").await.unwrap();
    let doc_type = fx.directory.create_document_type("Passport", None).await.unwrap();
    let doc = fx.documents.attach_document(NewOrderDocument::new(order.id, doc_type.id).with_file_path("id.pdf")).await.unwrap();
    let sent = fx.directory.create_document_status_type("Couriered", None).await.unwrap();
    fx.documents.record_sent_status(order.id, doc.id, sent.id).await.unwrap();
    fx.documents.add_comment(order.id, "Client called", None).await.unwrap();

    fx.orders.delete_order(order.id).await.unwrap();

    assert_eq!(fx.orders.get_order(order.id).await.unwrap_err(), LedgerError::OrderNotFound(order.id));
    for table in ["receipts", "expenses", "settlements", "order_documents", "sent_document_statuses", "comments"] {
        assert_eq!(fx.count_rows(table, order.id).await, 0, "{table} still has rows");
    }
    assert_eq!(fx.orders.delete_order(order.id).await.unwrap_err(), LedgerError::OrderNotFound(order.id));
    // The partner is not owned by the order
    assert!(fx.directory.partner(partner.id).await.unwrap().is_some());
    fx.tear_down().await;
}
