use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Neg, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::{op, RevenueShare};

const CENTS_PER_UNIT: i64 = 100;

//--------------------------------------       Money         ---------------------------------------------------------
/// A monetary amount, held as a whole number of minor units (cents).
///
/// Amounts may be negative. A negative amount is a legitimate settlement outcome when an order fails and its
/// expenses exceed the base charges.
#[derive(Debug, Clone, Copy, Default, Type, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct Money(i64);

op!(binary Money, Add, add);
op!(binary Money, Sub, sub);
op!(inplace Money, AddAssign, add_assign);
op!(inplace Money, SubAssign, sub_assign);
op!(unary Money, Neg, neg);

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Value cannot be represented as a money amount: {0}")]
pub struct MoneyConversionError(String);

impl From<i64> for Money {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = CENTS_PER_UNIT.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / unit, abs % unit)
    }
}

impl FromStr for Money {
    type Err = MoneyConversionError;

    /// Parses amounts such as `1000`, `-12.5` or `7.05`. At most two decimal places are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MoneyConversionError(s.to_string());
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        let all_digits = |v: &str| v.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || frac.len() > 2 || !all_digits(whole) || !all_digits(frac) {
            return Err(err());
        }
        let whole = whole.parse::<i64>().map_err(|_| err())?;
        let frac = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| err())? * 10,
            _ => frac.parse::<i64>().map_err(|_| err())?,
        };
        let cents = whole.checked_mul(CENTS_PER_UNIT).and_then(|c| c.checked_add(frac)).ok_or_else(err)?;
        Ok(Self(if negative { -cents } else { cents }))
    }
}

impl Money {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Creates an amount from whole currency units.
    pub fn from_major(units: i64) -> Self {
        Self(units * CENTS_PER_UNIT)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Self)
    }

    /// Sums the amounts, returning `None` if the total does not fit.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(amounts: I) -> Option<Self> {
        amounts.into_iter().try_fold(Self::default(), Self::checked_add)
    }

    /// Multiplies this amount by the given fraction, rounding half away from zero to the nearest cent.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn apply_share(&self, share: RevenueShare) -> Self {
        Self((self.0 as f64 * share.value()).round() as i64)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Money::from(42_000).to_string(), "420.00");
        assert_eq!(Money::from(-21_005).to_string(), "-210.05");
        assert_eq!(Money::from(7).to_string(), "0.07");
        assert_eq!(Money::default().to_string(), "0.00");
    }

    #[test]
    fn parse() {
        assert_eq!("1000".parse::<Money>().unwrap(), Money::from_major(1000));
        assert_eq!("12.5".parse::<Money>().unwrap(), Money::from(1250));
        assert_eq!("-0.07".parse::<Money>().unwrap(), Money::from(-7));
        assert_eq!(" +3.10 ".parse::<Money>().unwrap(), Money::from(310));
        assert!("abc".parse::<Money>().is_err());
        assert!("1.234".parse::<Money>().is_err());
        assert!(".5".parse::<Money>().is_err());
        assert!("1.-5".parse::<Money>().is_err());
    }

    #[test]
    fn arithmetic() {
        let mut a = Money::from_major(10);
        a -= Money::from_major(3);
        a += Money::from(50);
        assert_eq!(a, Money::from(750));
        assert_eq!(-a, Money::from(-750));
        let total: Money = [Money::from_major(200), Money::from_major(100)].iter().sum();
        assert_eq!(total, Money::from_major(300));
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let half = Money::from(i64::MAX / 2 + 1);
        assert_eq!(half.checked_add(half), None);
        assert_eq!(Money::from(i64::MIN).checked_sub(Money::from(1)), None);
        assert_eq!(Money::from(5).checked_sub(Money::from(7)), Some(Money::from(-2)));
        assert_eq!(Money::checked_sum([half, half]), None);
        assert_eq!(Money::checked_sum(vec![Money::from(1), Money::from(2)]), Some(Money::from(3)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::default()));
    }

    #[test]
    fn shares_round_to_the_nearest_cent() {
        let share = RevenueShare::new(0.4).unwrap();
        assert_eq!(Money::from_major(700).apply_share(share), Money::from_major(280));
        let share = RevenueShare::new(0.7).unwrap();
        assert_eq!(Money::from_major(-300).apply_share(share), Money::from_major(-210));
        let half = RevenueShare::default();
        assert_eq!(Money::from(5).apply_share(half), Money::from(3));
        assert_eq!(Money::from(-5).apply_share(half), Money::from(-3));
    }

    #[test]
    fn serializes_as_cents() {
        let json = serde_json::to_string(&Money::from(1234)).unwrap();
        assert_eq!(json, "1234");
    }
}
