use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::applied_payment::applied_payment::IntendedPurpose;
use crate::calendar::offset::OffsetDay;
use crate::error::GenerationError;
use crate::fees::config::{FeeType, SettlementRefund};
use crate::money::amount::Amount;
use crate::money::cent::Cent;
use crate::schedule::{generate, Schedule, ScheduleType};

use super::params::{PaymentConfig, ScheduleParameters};
use super::quote::{get_quote, QuoteOutcome};

/// How the new loan's fee balance is set when rolling an old one over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeHandling {
    /// Fold the outstanding fee balance into the new loan's principal,
    /// leaving the new loan with no separate fee balance of its own.
    CapitaliseAsPrincipal,
    /// Carry the outstanding fee balance forward unchanged as the new
    /// loan's fee balance; only principal and interest join the principal.
    CarryOverAsIs,
    /// Drop the outstanding fee balance entirely; neither the new
    /// principal nor the new loan's fees reflect it.
    WriteOffFeeBalance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverParams {
    pub rollover_day: OffsetDay,
    pub fee_handling: FeeHandling,
}

/// Settle the existing loan as of `rollover_day`, then build a fresh loan
/// starting on that day whose principal and fee balance follow
/// `fee_handling`, and rerun amortisation over both the closed-out current
/// loan and the new one. Returns `None` iff either run resolves to an
/// empty schedule.
pub fn roll_over(
    params: &ScheduleParameters,
    payment_config: &PaymentConfig,
    rollover: &RolloverParams,
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
        IntendedPurpose::SettlementOn(rollover.rollover_day),
    )?;
    let outstanding = match quote.outcome {
        QuoteOutcome::PaymentQuote(pq) => pq.apportionment,
        QuoteOutcome::AwaitPaymentConfirmation => return Err(GenerationError::AwaitingPaymentConfirmation),
        QuoteOutcome::UnableToGenerateQuote => return Err(GenerationError::UnableToGenerateQuote),
    };

    let (new_principal, new_fees_total) = match rollover.fee_handling {
        FeeHandling::CapitaliseAsPrincipal => (
            (outstanding.principal + outstanding.interest + outstanding.fees).at_least_zero(),
            Cent::ZERO,
        ),
        FeeHandling::CarryOverAsIs => (
            (outstanding.principal + outstanding.interest).at_least_zero(),
            outstanding.fees.at_least_zero(),
        ),
        FeeHandling::WriteOffFeeBalance => ((outstanding.principal + outstanding.interest).at_least_zero(), Cent::ZERO),
    };

    let rollover_date = rollover.rollover_day.to_date(params.start_date);

    let mut new_params = params.clone();
    new_params.principal = new_principal;
    new_params.start_date = rollover_date;
    new_params.as_of_date = rollover_date.max(params.as_of_date);
    new_params.fee_config = crate::fees::config::FeeConfig {
        fee_types: vec![FeeType {
            name: "rolled_over_balance".to_string(),
            amount: Amount::Simple(new_fees_total),
        }],
        rounding: params.fee_config.rounding,
        fee_amortisation: params.fee_config.fee_amortisation,
        settlement_refund: SettlementRefund::None,
    };

    let new_payment_config = PaymentConfig {
        schedule_config: payment_config.schedule_config.clone(),
        actual_payments: BTreeMap::new(),
    };

    let revised = generate(
        &new_params,
        &new_payment_config,
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
    use crate::fees::config::FeeAmortisation;
    use crate::interest::config::{Cap, InterestMethod};
    use crate::money::percent::{Percent, Rate};
    use crate::money::rounding::Rounding;
    use crate::schedule_gen::scheduled_payment::ScheduleConfig;
    use crate::unit_period::config::UnitPeriodConfig;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn params() -> ScheduleParameters {
        ScheduleParameters {
            principal: Cent::new(50_000),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            as_of_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            interest_config: crate::interest::config::InterestConfig {
                method: InterestMethod::Simple,
                standard_rate: Rate::Daily(Percent::from_decimal(dec!(0.001))),
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
    fn capitalising_fees_rolls_outstanding_balance_into_principal_only() {
        let p = params();
        let payment_config = PaymentConfig {
            schedule_config: ScheduleConfig::AutoGenerate {
                unit_period_config: UnitPeriodConfig::Monthly {
                    multiple: 1,
                    year: 2024,
                    month: 2,
                    day: 1,
                },
                payment_count: 3,
                max_duration: None,
            },
            actual_payments: BTreeMap::new(),
        };
        let rollover_params = RolloverParams {
            rollover_day: OffsetDay::new(30),
            fee_handling: FeeHandling::CapitaliseAsPrincipal,
        };
        let (_current, revised) = roll_over(&p, &payment_config, &rollover_params).unwrap().unwrap();
        let first = revised.schedule_items.first().unwrap();
        assert!(first.opening_balance > crate::money::decimal_cent::DecimalCent::from_cent(Cent::new(50_000)));
    }

    #[test]
    fn writing_off_fees_drops_them_from_the_new_loan() {
        let p = params();
        let payment_config = PaymentConfig {
            schedule_config: ScheduleConfig::AutoGenerate {
                unit_period_config: UnitPeriodConfig::Monthly {
                    multiple: 1,
                    year: 2024,
                    month: 2,
                    day: 1,
                },
                payment_count: 3,
                max_duration: None,
            },
            actual_payments: BTreeMap::new(),
        };
        let rollover_params = RolloverParams {
            rollover_day: OffsetDay::new(30),
            fee_handling: FeeHandling::WriteOffFeeBalance,
        };
        let (_current, revised) = roll_over(&p, &payment_config, &rollover_params).unwrap().unwrap();
        let first = revised.schedule_items.first().unwrap();
        assert_eq!(first.closing_fees_balance, Cent::ZERO);
    }
}
