use crate::db_types::Order;

/// A change to one of the monitored order fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    StatusChanged { from: i64, to: i64 },
    PaymentStatusChanged { from: bool, to: bool },
}

/// The monitored changes between two snapshots of the same order.
///
/// Only values are compared. Writing a field with the value it already has is not a change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDiff {
    transitions: Vec<Transition>,
}

impl OrderDiff {
    /// Status changes are listed before payment changes, which is the order in which handlers run.
    pub fn between(old: &Order, new: &Order) -> Self {
        let mut transitions = Vec::with_capacity(2);
        if old.status_id != new.status_id {
            transitions.push(Transition::StatusChanged { from: old.status_id, to: new.status_id });
        }
        if old.payment_status != new.payment_status {
            transitions.push(Transition::PaymentStatusChanged { from: old.payment_status, to: new.payment_status });
        }
        Self { transitions }
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn status_changed(&self) -> bool {
        self.transitions.iter().any(|t| matches!(t, Transition::StatusChanged { .. }))
    }

    pub fn payment_status_changed(&self) -> bool {
        self.transitions.iter().any(|t| matches!(t, Transition::PaymentStatusChanged { .. }))
    }
}
