use log::*;

use crate::{
    clock::Clock,
    db_types::{Order, Settlement},
    dispatch::order_diff::{OrderDiff, Transition},
    settlement::SettlementEngine,
    traits::{LedgerError, LedgerUnitOfWork},
};

/// Handlers never write monitored fields, so a second round always comes up empty. The bound turns a handler that
/// breaks this rule into an error instead of an endless loop.
pub const MAX_DISPATCH_ROUNDS: usize = 4;

/// Everything the handlers did in response to one committed change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The order after all handlers have run
    pub order: Order,
    pub settlements: Vec<Settlement>,
    /// True if `settlement_status` went from false to true
    pub newly_settled: bool,
}

impl DispatchOutcome {
    fn new(order: Order) -> Self {
        Self { order, settlements: Vec::new(), newly_settled: false }
    }
}

/// Routes changes of an order's monitored fields to the settlement engine.
///
/// The dispatcher is handed both snapshots of the order explicitly, together with the unit of work that wrote the
/// new one. Handlers run inside that unit of work, so their writes commit or roll back with the change itself.
#[derive(Debug, Clone)]
pub struct TransitionDispatcher<C> {
    engine: SettlementEngine<C>,
}

impl<C: Clock> TransitionDispatcher<C> {
    pub fn new(engine: SettlementEngine<C>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &SettlementEngine<C> {
        &self.engine
    }

    /// Runs the handlers for every monitored field that differs between `before` and `after`.
    ///
    /// Writes made by the handlers are diffed and dispatched in turn, under the same no-op rule. Any handler error
    /// is returned as is. The caller must then abandon the unit of work.
    pub async fn dispatch<U: LedgerUnitOfWork>(
        &self,
        before: &Order,
        after: Order,
        uow: &mut U,
    ) -> Result<DispatchOutcome, LedgerError> {
        let mut outcome = DispatchOutcome::new(after.clone());
        let mut previous = before.clone();
        let mut current = after;
        for round in 0..MAX_DISPATCH_ROUNDS {
            let diff = OrderDiff::between(&previous, &current);
            if diff.is_empty() {
                trace!("🔀️ {current}: no monitored changes in round {round}");
                outcome.order = current;
                return Ok(outcome);
            }
            debug!("🔀️ {current}: {} monitored change(s) in round {round}", diff.len());
            for transition in diff.transitions() {
                match *transition {
                    Transition::StatusChanged { from, to } => {
                        trace!("🔀️ {current}: status #{from} -> #{to}");
                        if let Some(settlement) = self.engine.on_status_changed(&current, uow).await? {
                            outcome.settlements.push(settlement);
                        }
                    },
                    Transition::PaymentStatusChanged { from, to } => {
                        trace!("🔀️ {current}: payment status {from} -> {to}");
                        if let Some(paid) = self.engine.on_payment_status_changed(&current, uow).await? {
                            outcome.newly_settled |= paid.newly_settled;
                        }
                    },
                }
            }
            let reloaded = uow.fetch_order(current.id).await?.ok_or(LedgerError::OrderNotFound(current.id))?;
            previous = current;
            current = reloaded;
        }
        error!("🔀️ {current}: handlers kept changing monitored fields. Giving up.");
        Err(LedgerError::DispatchLoop(MAX_DISPATCH_ROUNDS))
    }
}
