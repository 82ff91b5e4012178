//! Partner settlement.
//!
//! [`policy`] holds the split rules; [`SettlementEngine`] applies them to an order inside a unit of work.
mod engine;
pub mod policy;

pub use engine::{PaymentOutcome, SettlementEngine};
pub use policy::{SettlementInputs, SettlementSplit};
