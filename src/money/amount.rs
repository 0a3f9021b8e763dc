use serde::{Deserialize, Serialize};

use super::cent::Cent;
use super::percent::Percent;
use super::rounding::Rounding;

/// Bounds applied to a percentage-of-base amount before it is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Restriction {
    NoLimit,
    LowerBound(Cent),
    UpperBound(Cent),
}

impl Restriction {
    fn apply(&self, value: Cent) -> Cent {
        match self {
            Restriction::NoLimit => value,
            Restriction::LowerBound(bound) => value.max(*bound),
            Restriction::UpperBound(bound) => value.min(*bound),
        }
    }
}

/// A fee or charge amount: either a fixed number of cents, or a percentage
/// of some base (principal, overdue balance, ...) evaluated at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Amount {
    Simple(Cent),
    Percentage {
        rate: Percent,
        restriction: Restriction,
        rounding: Rounding,
    },
}

impl Amount {
    pub fn evaluate(&self, base: Cent) -> Cent {
        match self {
            Amount::Simple(cent) => *cent,
            Amount::Percentage {
                rate,
                restriction,
                rounding,
            } => restriction.apply(rate.of_rounded(base, *rounding)),
        }
    }
}
