use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

/// Directed rounding mode. Every call site that converts a fractional value
/// to whole minor units names its mode explicitly; there is no implicit default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rounding {
    Up,
    Down,
    HalfAwayFromZero,
    HalfToEven,
    HalfTowardZero,
}

impl Rounding {
    /// Round a decimal value to a whole number using this mode.
    pub fn round(&self, value: Decimal) -> Decimal {
        match self {
            Rounding::Up => value.round_dp_with_strategy(0, RoundingStrategy::AwayFromZero),
            Rounding::Down => value.round_dp_with_strategy(0, RoundingStrategy::ToZero),
            Rounding::HalfAwayFromZero => {
                value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            }
            Rounding::HalfToEven => {
                value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
            }
            Rounding::HalfTowardZero => {
                value.round_dp_with_strategy(0, RoundingStrategy::MidpointTowardZero)
            }
        }
    }
}
