//! Change detection for orders.
//!
//! Every write to an order goes through [`TransitionDispatcher::dispatch`] with the order as it was before and after
//! the write. Only changes to the monitored fields (`status_id` and `payment_status`) reach a handler. Writing a field
//! with its current value is not a change.
mod dispatcher;
mod order_diff;

pub use dispatcher::{DispatchOutcome, TransitionDispatcher, MAX_DISPATCH_ROUNDS};
pub use order_diff::{OrderDiff, Transition};
