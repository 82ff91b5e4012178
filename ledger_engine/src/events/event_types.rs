use serde::{Deserialize, Serialize};

use crate::db_types::{Order, Settlement};

/// A settlement was recorded for an order that reached a terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementCreatedEvent {
    pub order: Order,
    pub settlement: Settlement,
}

impl SettlementCreatedEvent {
    pub fn new(order: Order, settlement: Settlement) -> Self {
        Self { order, settlement }
    }
}

/// An order's `settlement_status` went from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSettledEvent {
    pub order: Order,
}

impl OrderSettledEvent {
    pub fn new(order: Order) -> Self {
        Self { order }
    }
}
