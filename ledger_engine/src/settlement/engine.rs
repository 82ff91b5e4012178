use ledger_common::Money;
use log::*;

use crate::{
    clock::Clock,
    db_types::{NewSettlement, Order, Settlement},
    settlement::policy::{split_for, SettlementInputs},
    traits::{LedgerError, LedgerUnitOfWork},
};

/// Computes and records settlements for orders that reach a terminal status, and maintains the derived
/// `settlement_status` flag.
///
/// The engine reads and writes exclusively through the unit of work it is handed, so the figures it computes from
/// and the settlement it records commit (or roll back) together with the change that triggered them.
#[derive(Debug, Clone)]
pub struct SettlementEngine<C> {
    clock: C,
}

/// The result of a payment-status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub order: Order,
    /// True if this call moved `settlement_status` from false to true.
    pub newly_settled: bool,
}

impl<C: Clock> SettlementEngine<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Handles a change of the order's status.
    ///
    /// If the new status is `Completed` or `Failed`, a settlement is computed from the order's current fees, base
    /// charges, expenses and partner share, and inserted. Any other status is a no-op.
    ///
    /// Returns a data integrity error, and inserts nothing, if the status or partner cannot be resolved or the
    /// partner's revenue share is out of range.
    pub async fn on_status_changed<U: LedgerUnitOfWork>(
        &self,
        order: &Order,
        uow: &mut U,
    ) -> Result<Option<Settlement>, LedgerError> {
        let status = uow.fetch_order_status(order.status_id).await?.ok_or_else(|| {
            error!("⚖️ {order} refers to status #{} which does not exist", order.status_id);
            LedgerError::DataIntegrity(format!("{order} refers to a missing status #{}", order.status_id))
        })?;
        if status.name.trim().is_empty() {
            return Err(LedgerError::DataIntegrity(format!("Status #{} has no name", status.id)));
        }
        let Some(terminal) = status.terminal() else {
            trace!("⚖️ {order} moved to '{}'. Nothing to settle.", status.name);
            return Ok(None);
        };
        let partner = uow.fetch_partner(order.partner_id).await?.ok_or_else(|| {
            error!("⚖️ {order} refers to partner #{} which does not exist", order.partner_id);
            LedgerError::DataIntegrity(format!("{order} refers to a missing partner #{}", order.partner_id))
        })?;
        let revenue_share = partner
            .revenue_share()
            .map_err(|e| LedgerError::DataIntegrity(format!("Partner #{} is misconfigured. {e}", partner.id)))?;
        let overflow = |what: &str| {
            error!("⚖️ The {what} of {order} do not fit in a money amount");
            LedgerError::DataIntegrity(format!("The {what} of {order} are out of range"))
        };
        let expenses = uow.fetch_expenses(order.id).await?;
        let total_expenses =
            Money::checked_sum(expenses.iter().map(|e| e.amount)).ok_or_else(|| overflow("expenses"))?;
        let receipts = uow.fetch_receipts(order.id).await?;
        let total_receipts =
            Money::checked_sum(receipts.iter().map(|r| r.amount)).ok_or_else(|| overflow("receipts"))?;
        let inputs = SettlementInputs {
            fees: order.fees,
            base_charges: order.base_charges,
            total_expenses,
            total_receipts,
            revenue_share,
        };
        let split = split_for(terminal, &inputs).ok_or_else(|| overflow("settlement amounts"))?;
        debug!(
            "⚖️ {order} is {terminal}. Fees: {}, base charges: {}, expenses: {total_expenses}, receipts: \
             {total_receipts}, partner share: {revenue_share}. Partner gets {}, we keep {}",
            order.fees, order.base_charges, split.partner_amount, split.self_amount
        );
        let settlement = NewSettlement {
            order_id: order.id,
            partner_id: partner.id,
            partner_amount: split.partner_amount,
            self_amount: split.self_amount,
            created_at: self.clock.now(),
        };
        let settlement = uow.insert_settlement(settlement).await?;
        info!("⚖️ Settlement #{} recorded for {order}", settlement.id);
        Ok(Some(settlement))
    }

    /// Handles a change of the order's payment flag.
    ///
    /// A paid order is marked as settled. Clearing the payment flag leaves `settlement_status` untouched.
    pub async fn on_payment_status_changed<U: LedgerUnitOfWork>(
        &self,
        order: &Order,
        uow: &mut U,
    ) -> Result<Option<PaymentOutcome>, LedgerError> {
        if !order.payment_status {
            trace!("⚖️ Payment flag cleared on {order}. Settlement status stays {}", order.settlement_status);
            return Ok(None);
        }
        let updated = uow.set_settlement_status(order.id, true, self.clock.now()).await?;
        let newly_settled = !order.settlement_status && updated.settlement_status;
        debug!("⚖️ {order} has been paid and is marked as settled");
        Ok(Some(PaymentOutcome { order: updated, newly_settled }))
    }
}
