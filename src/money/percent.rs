use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::cent::Cent;
use super::decimal_cent::DecimalCent;
use super::rounding::Rounding;

/// A decimal fraction, e.g. `0.08` for 8%. Not tied to a period; `Rate`
/// gives a `Percent` its daily-vs-annual meaning.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Percent(Decimal);

impl Percent {
    pub const ZERO: Percent = Percent(Decimal::ZERO);

    pub fn from_decimal(fraction: Decimal) -> Percent {
        Percent(fraction)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// `amount * self`, as a fractional-cent result so callers choose when to round.
    pub fn of(&self, amount: Cent) -> DecimalCent {
        DecimalCent::from_cent(amount) * self.0
    }

    pub fn of_rounded(&self, amount: Cent, rounding: Rounding) -> Cent {
        self.of(amount).round(rounding)
    }
}

/// Days in a year used to convert an annual rate to a daily one. The spec is
/// explicit that there is no leap-year adjustment.
const DAYS_PER_YEAR: Decimal = dec!(365);

/// An interest or fee rate tagged with the period it applies over.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Rate {
    Daily(Percent),
    Annual(Percent),
}

impl Rate {
    pub fn to_daily(&self) -> Percent {
        match self {
            Rate::Daily(p) => *p,
            Rate::Annual(p) => Percent::from_decimal(p.as_decimal() / DAYS_PER_YEAR),
        }
    }

    pub fn to_annual(&self) -> Percent {
        match self {
            Rate::Daily(p) => Percent::from_decimal(p.as_decimal() * DAYS_PER_YEAR),
            Rate::Annual(p) => *p,
        }
    }
}
