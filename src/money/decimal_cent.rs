use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cent::Cent;
use super::rounding::Rounding;

/// Fractional minor currency units, used while interest accrues so that the
/// sub-cent residue is never silently dropped. Only rounded to a `Cent` at
/// the point a value is actually charged to the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
pub struct DecimalCent(Decimal);

impl DecimalCent {
    pub const ZERO: DecimalCent = DecimalCent(Decimal::ZERO);

    pub fn from_decimal(value: Decimal) -> DecimalCent {
        DecimalCent(value)
    }

    pub fn from_cent(cent: Cent) -> DecimalCent {
        DecimalCent(Decimal::from(cent.value()))
    }

    pub fn raw(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn round(&self, rounding: Rounding) -> Cent {
        let rounded = rounding.round(self.0);
        Cent::new(rounded.try_into().unwrap_or(i64::MAX))
    }

    pub fn max(self, other: DecimalCent) -> DecimalCent {
        DecimalCent(self.0.max(other.0))
    }

    pub fn min(self, other: DecimalCent) -> DecimalCent {
        DecimalCent(self.0.min(other.0))
    }

    pub fn abs(&self) -> DecimalCent {
        DecimalCent(self.0.abs())
    }

    /// Clamp below at zero; used wherever the spec requires "clamp >= 0".
    pub fn at_least_zero(self) -> DecimalCent {
        self.max(DecimalCent::ZERO)
    }
}

impl Add for DecimalCent {
    type Output = DecimalCent;
    fn add(self, rhs: DecimalCent) -> DecimalCent {
        DecimalCent(self.0 + rhs.0)
    }
}

impl Sub for DecimalCent {
    type Output = DecimalCent;
    fn sub(self, rhs: DecimalCent) -> DecimalCent {
        DecimalCent(self.0 - rhs.0)
    }
}

impl Neg for DecimalCent {
    type Output = DecimalCent;
    fn neg(self) -> DecimalCent {
        DecimalCent(-self.0)
    }
}

impl AddAssign for DecimalCent {
    fn add_assign(&mut self, rhs: DecimalCent) {
        self.0 += rhs.0;
    }
}

impl SubAssign for DecimalCent {
    fn sub_assign(&mut self, rhs: DecimalCent) {
        self.0 -= rhs.0;
    }
}

impl Mul<Decimal> for DecimalCent {
    type Output = DecimalCent;
    fn mul(self, rhs: Decimal) -> DecimalCent {
        DecimalCent(self.0 * rhs)
    }
}

impl Sum for DecimalCent {
    fn sum<I: Iterator<Item = DecimalCent>>(iter: I) -> DecimalCent {
        iter.fold(DecimalCent::ZERO, Add::add)
    }
}
