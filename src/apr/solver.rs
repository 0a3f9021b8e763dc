use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::GenerationError;
use crate::money::cent::Cent;
use crate::money::percent::Percent;

use super::method::{AprMethod, AprSolution, Transfer};

const MAX_ITERATIONS: u32 = 100;
const CONVERGED_CENTS: f64 = 0.005;

/// Solve for the periodic rate `i` at which the advance equals the present
/// value of `transfers`, by the fixed-point update `i <- i * (pv/advance)^2`
/// used by the US Regulation Z actuarial method (and, with a straight-line
/// split of the fractional period, the UK method).
///
/// `periods_per_year` annualises the converged periodic rate (12 for
/// monthly payments, 52 for weekly, etc).
pub fn solve_apr(
    advance: Cent,
    transfers: &[Transfer],
    method: AprMethod,
    periods_per_year: Decimal,
) -> Result<AprSolution, GenerationError> {
    let advance_value = advance.value() as f64;
    if advance_value == 0.0 {
        return Ok(AprSolution {
            periodic_rate: Percent::ZERO,
            annual_percentage_rate: Percent::ZERO,
            iterations: 0,
        });
    }

    let days_per_period = (dec_365() / periods_per_year).to_f64().unwrap_or(30.0);
    let mut rate = 0.01_f64;

    for iteration in 1..=MAX_ITERATIONS {
        let present_value: f64 = transfers
            .iter()
            .map(|transfer| {
                let periods = transfer.day.value() as f64 / days_per_period;
                let discount = discount_factor(rate, periods, method);
                transfer.amount.value() as f64 / discount
            })
            .sum();

        let residual = present_value - advance_value;
        if residual.abs() < CONVERGED_CENTS {
            let periodic_rate = Decimal::from_f64_retain(rate).unwrap_or(Decimal::ZERO);
            return Ok(AprSolution {
                periodic_rate: Percent::from_decimal(periodic_rate),
                annual_percentage_rate: Percent::from_decimal(periodic_rate * periods_per_year),
                iterations: iteration,
            });
        }

        let adjustment = present_value / advance_value;
        rate *= adjustment * adjustment;
    }

    Err(GenerationError::SolverNonConvergence { iterations: MAX_ITERATIONS })
}

fn discount_factor(rate: f64, periods: f64, method: AprMethod) -> f64 {
    match method {
        AprMethod::UsActuarial => (1.0 + rate).powf(periods),
        AprMethod::UnitedKingdom => {
            let whole_periods = periods.trunc();
            let fractional = periods - whole_periods;
            (1.0 + rate).powf(whole_periods) * (1.0 + rate * fractional)
        }
    }
}

fn dec_365() -> Decimal {
    Decimal::from(365)
}
