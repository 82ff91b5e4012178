use std::fmt::Debug;

use log::*;

use crate::{
    clock::Clock,
    db_types::{Expense, NewLedgerEntry, NewOrder, Order, Receipt, ValidatedNewOrder},
    dispatch::{DispatchOutcome, TransitionDispatcher},
    events::{EventProducers, OrderSettledEvent, SettlementCreatedEvent},
    ledger_api::{
        order_locks::OrderLocks,
        order_objects::{check_non_negative, OrderLedger, OrderMutation},
    },
    settlement::SettlementEngine,
    traits::{LedgerDatabase, LedgerError, LedgerUnitOfWork, ValidationError},
};

/// `OrderFlowApi` is the primary API for changing orders and the money recorded against them.
///
/// Every mutating call runs in its own unit of work under the order's lock. A status or payment change and the
/// settlement work it triggers are committed together, or not at all. Hooks are notified only after the commit.
pub struct OrderFlowApi<B, C> {
    db: B,
    clock: C,
    dispatcher: TransitionDispatcher<C>,
    locks: OrderLocks,
    producers: EventProducers,
}

impl<B, C> Debug for OrderFlowApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, C: Clock> OrderFlowApi<B, C> {
    pub fn new(db: B, clock: C, producers: EventProducers) -> Self {
        let dispatcher = TransitionDispatcher::new(SettlementEngine::new(clock.clone()));
        Self { db, clock, dispatcher, locks: OrderLocks::new(), producers }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<B, C> OrderFlowApi<B, C>
where
    B: LedgerDatabase,
    C: Clock,
{
    /// Creates a new order.
    ///
    /// All five references must be given and must exist, and the money fields must not be negative. Nothing is
    /// written otherwise. A new order has no previous state, so no transition is dispatched.
    pub async fn create_order(&self, order: NewOrder) -> Result<Order, LedgerError> {
        let order = self.validate_new_order(order)?;
        let mut reader = self.db.begin().await?;
        let checked = self.check_order_references(&order, &mut reader).await;
        close_read_only(reader).await;
        checked?;
        // The foreign keys catch a reference that disappears in between
        let mut uow = self.db.begin().await?;
        let result = uow.insert_order(order).await;
        let order = finish(uow, result).await?;
        info!("📦️ {order} created for client #{} via partner #{}", order.client_id, order.partner_id);
        Ok(order)
    }

    /// Applies `mutation` to the order and runs the settlement handlers for any status or payment change.
    ///
    /// The call is all-or-nothing. If a handler fails (e.g. the order's partner has gone missing), the order keeps its
    /// previous values and the error is returned. A [`LedgerError::Concurrency`] error can be retried.
    pub async fn submit_order_mutation(&self, order_id: i64, mutation: OrderMutation) -> Result<Order, LedgerError> {
        mutation.validate()?;
        let _guard = self.locks.lock(order_id).await;
        let mut uow = self.db.begin().await?;
        let result = self.apply_mutation(order_id, &mutation, &mut uow).await;
        let outcome = finish(uow, result).await?;
        debug!(
            "📦️ Order #{order_id} updated ({mutation}). {} settlement(s) recorded",
            outcome.settlements.len()
        );
        self.notify(&outcome).await;
        Ok(outcome.order)
    }

    /// Fetches the order with its settlement history (oldest first), receipts and expenses.
    pub async fn get_order(&self, order_id: i64) -> Result<OrderLedger, LedgerError> {
        let mut uow = self.db.begin().await?;
        let result: Result<OrderLedger, LedgerError> = async {
            let order = uow.fetch_order(order_id).await?.ok_or(LedgerError::OrderNotFound(order_id))?;
            let settlements = uow.fetch_settlements(order_id).await?;
            let receipts = uow.fetch_receipts(order_id).await?;
            let expenses = uow.fetch_expenses(order_id).await?;
            Ok(OrderLedger { order, settlements, receipts, expenses })
        }
        .await;
        close_read_only(uow).await;
        result
    }

    /// Records money received against the order. Receipts never trigger a settlement.
    pub async fn add_receipt(&self, entry: NewLedgerEntry) -> Result<Receipt, LedgerError> {
        check_non_negative("amount", Some(entry.amount))?;
        let entry = NewLedgerEntry { created_at: self.clock.now(), ..entry };
        let _guard = self.locks.lock(entry.order_id).await;
        let mut uow = self.db.begin().await?;
        let result: Result<Receipt, LedgerError> = async {
            uow.lock_order(entry.order_id).await?.ok_or(LedgerError::OrderNotFound(entry.order_id))?;
            uow.insert_receipt(entry).await
        }
        .await;
        finish(uow, result).await
    }

    /// Records money spent on the order. Expenses never trigger a settlement. They are picked up by the next one.
    pub async fn add_expense(&self, entry: NewLedgerEntry) -> Result<Expense, LedgerError> {
        check_non_negative("amount", Some(entry.amount))?;
        let entry = NewLedgerEntry { created_at: self.clock.now(), ..entry };
        let _guard = self.locks.lock(entry.order_id).await;
        let mut uow = self.db.begin().await?;
        let result: Result<Expense, LedgerError> = async {
            uow.lock_order(entry.order_id).await?.ok_or(LedgerError::OrderNotFound(entry.order_id))?;
            uow.insert_expense(entry).await
        }
        .await;
        finish(uow, result).await
    }

    /// Deletes the order along with its receipts, expenses, settlements, documents and comments.
    pub async fn delete_order(&self, order_id: i64) -> Result<(), LedgerError> {
        let _guard = self.locks.lock(order_id).await;
        let mut uow = self.db.begin().await?;
        let result: Result<bool, LedgerError> = async {
            uow.lock_order(order_id).await?.ok_or(LedgerError::OrderNotFound(order_id))?;
            uow.delete_order(order_id).await
        }
        .await;
        finish(uow, result).await?;
        info!("📦️ Order #{order_id} deleted");
        Ok(())
    }

    fn validate_new_order(&self, order: NewOrder) -> Result<ValidatedNewOrder, ValidationError> {
        let client_id = order.client_id.ok_or(ValidationError::MissingField("client"))?;
        let partner_id = order.partner_id.ok_or(ValidationError::MissingField("partner"))?;
        let order_type_id = order.order_type_id.ok_or(ValidationError::MissingField("order_type"))?;
        let company_id = order.company_id.ok_or(ValidationError::MissingField("company"))?;
        let status_id = order.status_id.ok_or(ValidationError::MissingField("status"))?;
        check_non_negative("fees", Some(order.fees))?;
        check_non_negative("base_charges", Some(order.base_charges))?;
        Ok(ValidatedNewOrder {
            client_id,
            partner_id,
            order_type_id,
            company_id,
            status_id,
            fees: order.fees,
            base_charges: order.base_charges,
            created_at: self.clock.now(),
        })
    }

    async fn check_order_references(
        &self,
        order: &ValidatedNewOrder,
        uow: &mut B::UnitOfWork,
    ) -> Result<(), LedgerError> {
        let refs = OrderMutation {
            client_id: Some(order.client_id),
            partner_id: Some(order.partner_id),
            order_type_id: Some(order.order_type_id),
            company_id: Some(order.company_id),
            status_id: Some(order.status_id),
            ..Default::default()
        };
        check_references(&refs, uow).await
    }

    async fn apply_mutation(
        &self,
        order_id: i64,
        mutation: &OrderMutation,
        uow: &mut B::UnitOfWork,
    ) -> Result<DispatchOutcome, LedgerError> {
        let before = uow.lock_order(order_id).await?.ok_or(LedgerError::OrderNotFound(order_id))?;
        check_references(mutation, uow).await?;
        let mut after = mutation.apply_to(&before);
        after.updated_at = self.clock.now();
        let after = uow.update_order(&after).await?;
        self.dispatcher.dispatch(&before, after, uow).await
    }

    async fn notify(&self, outcome: &DispatchOutcome) {
        for settlement in &outcome.settlements {
            let event = SettlementCreatedEvent::new(outcome.order.clone(), settlement.clone());
            self.producers.publish_settlement_created(event).await;
        }
        if outcome.newly_settled {
            self.producers.publish_order_settled(OrderSettledEvent::new(outcome.order.clone())).await;
        }
    }
}

/// Checks that every reference set in the mutation points at an existing record.
async fn check_references<U: LedgerUnitOfWork>(refs: &OrderMutation, uow: &mut U) -> Result<(), LedgerError> {
    let unknown = |entity: &'static str, id: i64| LedgerError::from(ValidationError::UnknownReference { entity, id });
    if let Some(id) = refs.client_id {
        uow.fetch_client(id).await?.ok_or_else(|| unknown("client", id))?;
    }
    if let Some(id) = refs.partner_id {
        uow.fetch_partner(id).await?.ok_or_else(|| unknown("partner", id))?;
    }
    if let Some(id) = refs.order_type_id {
        uow.fetch_order_type(id).await?.ok_or_else(|| unknown("order type", id))?;
    }
    if let Some(id) = refs.company_id {
        uow.fetch_company(id).await?.ok_or_else(|| unknown("company", id))?;
    }
    if let Some(id) = refs.status_id {
        uow.fetch_order_status(id).await?.ok_or_else(|| unknown("status", id))?;
    }
    Ok(())
}

/// Ends a unit of work that has not written anything.
async fn close_read_only<U: LedgerUnitOfWork>(uow: U) {
    if let Err(e) = uow.rollback().await {
        warn!("📦️ Could not close read-only unit of work. {e}");
    }
}

/// Commits the unit of work if `result` is a success. Otherwise rolls it back and returns the original error.
async fn finish<U: LedgerUnitOfWork, T>(uow: U, result: Result<T, LedgerError>) -> Result<T, LedgerError> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        },
        Err(e) => {
            debug!("📦️ Rolling back. {e}");
            if let Err(rollback_err) = uow.rollback().await {
                error!("📦️ Rollback failed. {rollback_err}. The transaction is discarded when it is dropped.");
            }
            Err(e)
        },
    }
}
