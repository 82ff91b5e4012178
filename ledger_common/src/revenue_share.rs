use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_REVENUE_SHARE: f64 = 0.5;

/// The fraction of net proceeds that is allocated to a referring partner. Always within `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct RevenueShare(f64);

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Revenue share must be a fraction between 0 and 1, but was {0}")]
pub struct RevenueShareError(pub f64);

impl RevenueShare {
    pub fn new(value: f64) -> Result<Self, RevenueShareError> {
        if value.is_nan() || !(0.0..=1.0).contains(&value) {
            return Err(RevenueShareError(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// The share retained by the business, `1 - share`.
    pub fn complement(&self) -> Self {
        Self(1.0 - self.0)
    }
}

impl Default for RevenueShare {
    fn default() -> Self {
        Self(DEFAULT_REVENUE_SHARE)
    }
}

impl TryFrom<f64> for RevenueShare {
    type Error = RevenueShareError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RevenueShare> for f64 {
    fn from(value: RevenueShare) -> Self {
        value.0
    }
}

impl Display for RevenueShare {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}
