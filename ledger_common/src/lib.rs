mod money;
mod revenue_share;

pub mod helpers;
pub mod op;

pub use money::{Money, MoneyConversionError};
pub use revenue_share::{RevenueShare, RevenueShareError, DEFAULT_REVENUE_SHARE};
