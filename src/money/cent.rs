use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// A signed amount of integer minor currency units (e.g. cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cent(i64);

impl Cent {
    pub const ZERO: Cent = Cent(0);

    pub fn new(minor_units: i64) -> Cent {
        Cent(minor_units)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn abs(&self) -> Cent {
        Cent(self.0.abs())
    }

    pub fn max(self, other: Cent) -> Cent {
        Cent(self.0.max(other.0))
    }

    pub fn min(self, other: Cent) -> Cent {
        Cent(self.0.min(other.0))
    }

    /// Clamp below at zero; used wherever the spec requires "clamp >= 0".
    pub fn at_least_zero(self) -> Cent {
        self.max(Cent::ZERO)
    }
}

impl Add for Cent {
    type Output = Cent;
    fn add(self, rhs: Cent) -> Cent {
        Cent(self.0 + rhs.0)
    }
}

impl Sub for Cent {
    type Output = Cent;
    fn sub(self, rhs: Cent) -> Cent {
        Cent(self.0 - rhs.0)
    }
}

impl Neg for Cent {
    type Output = Cent;
    fn neg(self) -> Cent {
        Cent(-self.0)
    }
}

impl AddAssign for Cent {
    fn add_assign(&mut self, rhs: Cent) {
        self.0 += rhs.0;
    }
}

impl SubAssign for Cent {
    fn sub_assign(&mut self, rhs: Cent) {
        self.0 -= rhs.0;
    }
}

impl Sum for Cent {
    fn sum<I: Iterator<Item = Cent>>(iter: I) -> Cent {
        iter.fold(Cent::ZERO, Add::add)
    }
}

impl fmt::Display for Cent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0.abs() % 100)
    }
}
