//! The money-split rules applied when an order reaches a terminal status.
//!
//! These functions are pure: they see only the figures handed to them and never touch the store.
use ledger_common::{Money, RevenueShare};
use serde::{Deserialize, Serialize};

use crate::db_types::TerminalStatus;

/// The order's figures at the moment a terminal transition is observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettlementInputs {
    pub fees: Money,
    pub base_charges: Money,
    pub total_expenses: Money,
    /// Collected for reporting. Receipts do not enter either formula.
    pub total_receipts: Money,
    pub revenue_share: RevenueShare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSplit {
    pub partner_amount: Money,
    pub self_amount: Money,
}

impl SettlementSplit {
    pub fn total(&self) -> Option<Money> {
        self.partner_amount.checked_add(self.self_amount)
    }
}

/// Returns `None` if an intermediate amount does not fit in a [`Money`].
pub fn split_for(status: TerminalStatus, inputs: &SettlementInputs) -> Option<SettlementSplit> {
    match status {
        TerminalStatus::Completed => completed_split(inputs.fees, inputs.total_expenses, inputs.revenue_share),
        TerminalStatus::Failed => failed_split(inputs.base_charges, inputs.total_expenses, inputs.revenue_share),
    }
}

/// A completed order splits its net fees (fees less expenses) by the partner's revenue share.
///
/// The business keeps the remainder after the partner's rounded amount, so the two amounts always add up to the net.
pub fn completed_split(fees: Money, total_expenses: Money, share: RevenueShare) -> Option<SettlementSplit> {
    let net = fees.checked_sub(total_expenses)?;
    let partner_amount = net.apply_share(share);
    Some(SettlementSplit { partner_amount, self_amount: net.checked_sub(partner_amount)? })
}

/// A failed order settles against its base charges.
///
/// * If expenses are below the base charges, the partner gets their share of what is left and the business keeps
///   nothing.
/// * Otherwise the partner gets their share of the full base charges, and the business books its share of the
///   shortfall, which is zero or negative.
pub fn failed_split(base_charges: Money, total_expenses: Money, share: RevenueShare) -> Option<SettlementSplit> {
    let remainder = base_charges.checked_sub(total_expenses)?;
    let split = if total_expenses < base_charges {
        SettlementSplit { partner_amount: remainder.apply_share(share), self_amount: Money::default() }
    } else {
        SettlementSplit {
            partner_amount: base_charges.apply_share(share),
            self_amount: remainder.apply_share(share.complement()),
        }
    };
    Some(split)
}
