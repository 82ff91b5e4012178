use std::fmt::Display;

use ledger_common::Money;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Expense, Order, Receipt, Settlement},
    traits::ValidationError,
};

/// The fields of an order a caller may change. `None` leaves the field as it is.
///
/// `settlement_status` is not here. It is derived from `payment_status` by the settlement engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderMutation {
    pub client_id: Option<i64>,
    pub partner_id: Option<i64>,
    pub order_type_id: Option<i64>,
    pub company_id: Option<i64>,
    pub status_id: Option<i64>,
    pub fees: Option<Money>,
    pub base_charges: Option<Money>,
    pub payment_status: Option<bool>,
}

impl OrderMutation {
    pub fn with_new_client(mut self, client_id: i64) -> Self {
        self.client_id = Some(client_id);
        self
    }

    pub fn with_new_partner(mut self, partner_id: i64) -> Self {
        self.partner_id = Some(partner_id);
        self
    }

    pub fn with_new_order_type(mut self, order_type_id: i64) -> Self {
        self.order_type_id = Some(order_type_id);
        self
    }

    pub fn with_new_company(mut self, company_id: i64) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_new_status(mut self, status_id: i64) -> Self {
        self.status_id = Some(status_id);
        self
    }

    pub fn with_new_fees(mut self, fees: Money) -> Self {
        self.fees = Some(fees);
        self
    }

    pub fn with_new_base_charges(mut self, base_charges: Money) -> Self {
        self.base_charges = Some(base_charges);
        self
    }

    pub fn with_payment_status(mut self, paid: bool) -> Self {
        self.payment_status = Some(paid);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.client_id.is_none() &&
            self.partner_id.is_none() &&
            self.order_type_id.is_none() &&
            self.company_id.is_none() &&
            self.status_id.is_none() &&
            self.fees.is_none() &&
            self.base_charges.is_none() &&
            self.payment_status.is_none()
    }

    /// Rejects mutations that could never be applied, regardless of the order's current state.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyMutation);
        }
        check_non_negative("fees", self.fees)?;
        check_non_negative("base_charges", self.base_charges)
    }

    /// Returns a copy of `order` with the mutation applied. Fields that are not set keep their current value.
    pub fn apply_to(&self, order: &Order) -> Order {
        let mut updated = order.clone();
        if let Some(v) = self.client_id {
            updated.client_id = v;
        }
        if let Some(v) = self.partner_id {
            updated.partner_id = v;
        }
        if let Some(v) = self.order_type_id {
            updated.order_type_id = v;
        }
        if let Some(v) = self.company_id {
            updated.company_id = v;
        }
        if let Some(v) = self.status_id {
            updated.status_id = v;
        }
        if let Some(v) = self.fees {
            updated.fees = v;
        }
        if let Some(v) = self.base_charges {
            updated.base_charges = v;
        }
        if let Some(v) = self.payment_status {
            updated.payment_status = v;
        }
        updated
    }
}

pub(crate) fn check_non_negative(field: &'static str, amount: Option<Money>) -> Result<(), ValidationError> {
    match amount {
        Some(a) if a.is_negative() => Err(ValidationError::NegativeAmount { field, value: a.to_string() }),
        _ => Ok(()),
    }
}

impl Display for OrderMutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No changes.");
        }
        let mut parts = Vec::new();
        if let Some(v) = self.client_id {
            parts.push(format!("client: #{v}"));
        }
        if let Some(v) = self.partner_id {
            parts.push(format!("partner: #{v}"));
        }
        if let Some(v) = self.order_type_id {
            parts.push(format!("order type: #{v}"));
        }
        if let Some(v) = self.company_id {
            parts.push(format!("company: #{v}"));
        }
        if let Some(v) = self.status_id {
            parts.push(format!("status: #{v}"));
        }
        if let Some(v) = self.fees {
            parts.push(format!("fees: {v}"));
        }
        if let Some(v) = self.base_charges {
            parts.push(format!("base charges: {v}"));
        }
        if let Some(v) = self.payment_status {
            parts.push(format!("paid: {v}"));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// An order together with its money movements and its settlement history, oldest settlement first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLedger {
    pub order: Order,
    pub settlements: Vec<Settlement>,
    pub receipts: Vec<Receipt>,
    pub expenses: Vec<Expense>,
}

impl OrderLedger {
    /// `None` if the total does not fit in a [`Money`].
    pub fn total_receipts(&self) -> Option<Money> {
        Money::checked_sum(self.receipts.iter().map(|r| r.amount))
    }

    /// `None` if the total does not fit in a [`Money`].
    pub fn total_expenses(&self) -> Option<Money> {
        Money::checked_sum(self.expenses.iter().map(|e| e.amount))
    }

    pub fn latest_settlement(&self) -> Option<&Settlement> {
        self.settlements.last()
    }
}
