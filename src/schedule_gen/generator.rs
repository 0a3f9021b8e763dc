use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calendar::offset::OffsetDay;
use crate::error::GenerationError;
use crate::interest::accrual::accrue_interest;
use crate::interest::config::InterestConfig;
use crate::money::cent::Cent;
use crate::money::decimal_cent::DecimalCent;
use crate::money::rounding::Rounding;
use crate::unit_period::config::{generate_payment_schedule, Direction};

use super::scheduled_payment::{FixedScheduleEntry, ScheduleConfig, ScheduledPayment};

const MAX_ITERATIONS: u32 = 100;
const TOLERANCE_CENTS: Decimal = dec!(1);

/// Turn a `ScheduleConfig` into the concrete per-day scheduled payments it
/// describes. `AutoGenerate` solves for the level payment that fully
/// amortises `principal + fees_total` against `interest_config` over the
/// generated dates; the other variants just lay out what they're given.
#[tracing::instrument(skip(config, interest_config), fields(principal = principal.value(), fees_total = fees_total.value()))]
pub fn generate_schedule(
    config: &ScheduleConfig,
    principal: Cent,
    fees_total: Cent,
    start_date: NaiveDate,
    interest_config: &InterestConfig,
    rounding: Rounding,
) -> Result<BTreeMap<OffsetDay, ScheduledPayment>, GenerationError> {
    match config {
        ScheduleConfig::CustomSchedule(entries) => Ok(entries.clone()),
        ScheduleConfig::FixedSchedules(entries) => fixed_schedule(entries, start_date),
        ScheduleConfig::AutoGenerate {
            unit_period_config,
            payment_count,
            max_duration,
        } => {
            let mut dates = generate_payment_schedule(*payment_count, Direction::Forward, unit_period_config)?;
            if let Some(max) = max_duration {
                let cutoff = start_date + chrono::Duration::days(max.value());
                dates.retain(|date| *date <= cutoff);
            }
            if dates.is_empty() {
                return Err(GenerationError::SolverNonConvergence { iterations: 0 });
            }
            let payment =
                solve_level_payment(principal, fees_total, &dates, start_date, start_date, interest_config, rounding)?;
            Ok(dates
                .into_iter()
                .map(|date| (OffsetDay::of(start_date, date), ScheduledPayment::original_only(payment)))
                .collect())
        }
    }
}

fn fixed_schedule(
    entries: &[FixedScheduleEntry],
    start_date: NaiveDate,
) -> Result<BTreeMap<OffsetDay, ScheduledPayment>, GenerationError> {
    let mut out = BTreeMap::new();
    for entry in entries {
        let dates = generate_payment_schedule(entry.payment_count, Direction::Forward, &entry.unit_period_config)?;
        for date in dates {
            out.insert(
                OffsetDay::of(start_date, date),
                ScheduledPayment::original_only(entry.payment_amount),
            );
        }
    }
    Ok(out)
}

/// Bisect for the flat payment amount that drains `principal + fees_total`
/// to (within a cent of) zero across `dates`, accruing interest day by day
/// per `interest_config`. Monotonic in payment size, so bisection always
/// converges unless the schedule itself is degenerate (e.g. a single payment
/// too small to cover even the first period's interest).
///
/// `iteration_start` is where accrual begins (the loan's start date, or a
/// reschedule day when regenerating a tail); `loan_start_date` is always the
/// original loan start, since that's what the interest config's grace
/// period is measured against.
pub(crate) fn solve_level_payment(
    principal: Cent,
    fees_total: Cent,
    dates: &[NaiveDate],
    iteration_start: NaiveDate,
    loan_start_date: NaiveDate,
    interest_config: &InterestConfig,
    rounding: Rounding,
) -> Result<Cent, GenerationError> {
    let financed = DecimalCent::from_cent(principal + fees_total);

    let ending_balance = |payment: Cent| -> Decimal {
        let mut balance = financed;
        let mut previous = iteration_start;
        for date in dates {
            let rates = interest_config.daily_rates(previous, *date, loan_start_date, false);
            let interest = accrue_interest(balance.round(rounding), interest_config.cap.daily, &rates);
            balance += interest;
            balance -= DecimalCent::from_cent(payment);
            previous = *date;
        }
        balance.raw()
    };

    let mut low = Decimal::ZERO;
    let mut high = financed.raw() * dec!(2) + dec!(100);

    for iteration in 0..MAX_ITERATIONS {
        let mid = (low + high) / dec!(2);
        let mid_cent = Cent::new(mid.round().try_into().unwrap_or(i64::MAX));
        let residual = ending_balance(mid_cent);
        tracing::debug!(iteration, payment = mid_cent.value(), residual = %residual, "level-payment bisection step");
        if residual.abs() <= TOLERANCE_CENTS {
            return Ok(mid_cent);
        }
        if residual > Decimal::ZERO {
            low = mid;
        } else {
            high = mid;
        }
    }
    tracing::warn!(iterations = MAX_ITERATIONS, "level-payment solver did not converge");
    Err(GenerationError::SolverNonConvergence { iterations: MAX_ITERATIONS })
}
