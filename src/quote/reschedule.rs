use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::applied_payment::applied_payment::IntendedPurpose;
use crate::calendar::offset::OffsetDay;
use crate::error::GenerationError;
use crate::money::cent::Cent;
use crate::schedule::{generate, Schedule, ScheduleType};
use crate::schedule_gen::generator::{generate_schedule, solve_level_payment};
use crate::schedule_gen::scheduled_payment::{ScheduleConfig, ScheduledPayment};
use crate::unit_period::config::{generate_payment_schedule, Direction, UnitPeriodConfig};

use super::params::{PaymentConfig, ScheduleParameters};
use super::quote::{get_quote, QuoteOutcome};

/// What a reschedule replaces: everything from `reschedule_day` onward gets
/// torn up and replaced with a fresh level-payment plan over the remaining
/// balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleParams {
    pub reschedule_day: OffsetDay,
    pub unit_period_config: UnitPeriodConfig,
    pub payment_count: usize,
}

/// Quote the outstanding balance as of `reschedule_day`, regenerate the
/// schedule from that day forward as a fresh level-payment plan, and rerun
/// amortisation over both the untouched current plan and the revised one.
/// Scheduled entries before `reschedule_day` are kept untouched; actual
/// payments carry over unchanged, since they describe history rather than
/// the plan. Returns `None` iff either run resolves to an empty schedule.
pub fn reschedule(
    params: &ScheduleParameters,
    payment_config: &PaymentConfig,
    reschedule: &RescheduleParams,
) -> Result<Option<(Schedule, Schedule)>, GenerationError> {
    let current = generate(
        params,
        payment_config,
        IntendedPurpose::Statement,
        ScheduleType::Original,
        false,
    )?;

    let quote = get_quote(
        params,
        payment_config,
        IntendedPurpose::SettlementOn(reschedule.reschedule_day),
    )?;
    let outstanding = match quote.outcome {
        QuoteOutcome::PaymentQuote(pq) => pq.payment_value,
        QuoteOutcome::AwaitPaymentConfirmation => return Err(GenerationError::AwaitingPaymentConfirmation),
        QuoteOutcome::UnableToGenerateQuote => return Err(GenerationError::UnableToGenerateQuote),
    }
    .at_least_zero();

    let original_schedule = generate_schedule(
        &payment_config.schedule_config,
        params.principal,
        params.fees_total(),
        params.start_date,
        &params.interest_config,
        params.rounding,
    )?;

    let mut combined: BTreeMap<OffsetDay, ScheduledPayment> = original_schedule
        .into_iter()
        .filter(|(day, _)| *day < reschedule.reschedule_day)
        .collect();

    let reschedule_date = reschedule.reschedule_day.to_date(params.start_date);
    let tail_dates = generate_payment_schedule(reschedule.payment_count, Direction::Forward, &reschedule.unit_period_config)?;
    let tail_payment = solve_level_payment(
        outstanding,
        Cent::ZERO,
        &tail_dates,
        reschedule_date,
        params.start_date,
        &params.interest_config,
        params.rounding,
    )?;
    for date in tail_dates {
        combined.insert(
            OffsetDay::of(params.start_date, date),
            ScheduledPayment::original_only(tail_payment),
        );
    }

    let revised_payment_config = PaymentConfig {
        schedule_config: ScheduleConfig::CustomSchedule(combined),
        actual_payments: payment_config.actual_payments.clone(),
    };

    let revised = generate(
        params,
        &revised_payment_config,
        IntendedPurpose::Statement,
        ScheduleType::Rescheduled,
        true,
    )?;

    Ok(match (current, revised) {
        (Some(current), Some(revised)) => Some((current, revised)),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apr::method::AprMethod;
    use crate::calendar::offset::DurationDay;
    use crate::fees::charge::ChargeGrouping;
    use crate::fees::config::{FeeAmortisation, SettlementRefund};
    use crate::interest::config::{Cap, InterestMethod};
    use crate::money::percent::{Percent, Rate};
    use crate::money::rounding::Rounding;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn params() -> ScheduleParameters {
        ScheduleParameters {
            principal: Cent::new(100_000),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            as_of_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            interest_config: crate::interest::config::InterestConfig {
                method: InterestMethod::Simple,
                standard_rate: Rate::Daily(Percent::from_decimal(dec!(0.0008))),
                cap: Cap { daily: None, total: None },
                initial_grace_period: DurationDay::new(0),
                promotional_rates: vec![],
                rate_on_negative_balance: None,
            },
            fee_config: crate::fees::config::FeeConfig {
                fee_types: vec![],
                rounding: Rounding::HalfAwayFromZero,
                fee_amortisation: FeeAmortisation::AmortiseBeforePrincipal,
                settlement_refund: SettlementRefund::None,
            },
            charge_config: crate::fees::charge::ChargeConfig {
                charge_types: vec![],
                charge_holidays: vec![],
                charge_grouping: ChargeGrouping::AllChargesApplied,
                late_payment_grace_period: DurationDay::new(0),
            },
            payment_timeout: DurationDay::new(30),
            rounding: Rounding::HalfAwayFromZero,
            apr_method: AprMethod::UsActuarial,
            periods_per_year: dec!(12),
        }
    }

    #[test]
    fn reschedule_replaces_the_tail_from_the_reschedule_day_forward() {
        let p = params();
        let original = ScheduleConfig::AutoGenerate {
            unit_period_config: UnitPeriodConfig::Monthly {
                multiple: 1,
                year: 2024,
                month: 2,
                day: 1,
            },
            payment_count: 6,
            max_duration: None,
        };
        let payment_config = PaymentConfig {
            schedule_config: original,
            actual_payments: BTreeMap::new(),
        };
        let reschedule_params = RescheduleParams {
            reschedule_day: OffsetDay::new(60),
            unit_period_config: UnitPeriodConfig::Monthly {
                multiple: 1,
                year: 2024,
                month: 4,
                day: 1,
            },
            payment_count: 12,
        };
        let (current, revised) = reschedule(&p, &payment_config, &reschedule_params).unwrap().unwrap();

        // The current plan is untouched: six monthly payments, none rescheduled.
        assert_eq!(current.final_scheduled_payment_count, 6);

        // The revised plan keeps the one payment due before day 60 and
        // replaces everything from day 60 onward with the new 12-payment tail.
        assert_eq!(revised.final_scheduled_payment_count, 13);
        let before_cutoff = revised
            .schedule_items
            .iter()
            .filter(|item| item.offset_day.value() < 60)
            .count();
        assert_eq!(before_cutoff, 1);
    }
}
