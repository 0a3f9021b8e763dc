use serde::{Deserialize, Serialize};

use crate::calendar::offset::OffsetDay;
use crate::money::cent::Cent;
use crate::money::percent::Percent;

/// Which day-count convention governs partial-period discounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AprMethod {
    UsActuarial,
    UnitedKingdom,
}

/// A single cash flow in the APR calculation: the advance is a `Transfer` at
/// day zero, every scheduled/actual payment afterward is another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub day: OffsetDay,
    pub amount: Cent,
}

/// The result of `solve_apr`: the periodic rate the iteration converged on,
/// its annualisation, and how many iterations it took.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AprSolution {
    pub periodic_rate: Percent,
    pub annual_percentage_rate: Percent,
    pub iterations: u32,
}
