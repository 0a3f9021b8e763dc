use serde::{Deserialize, Serialize};

use crate::applied_payment::applied_payment::IntendedPurpose;
use crate::applied_payment::builder::build_applied_payments;
use crate::apr::method::{AprMethod, AprSolution, Transfer};
use crate::apr::solver::solve_apr;
use crate::calendar::offset::OffsetDay;
use crate::engine::amortise::amortise;
use crate::engine::schedule_item::ScheduleItem;
use crate::error::GenerationError;
use crate::money::cent::Cent;
use crate::money::percent::{Percent, Rate};
use crate::schedule_gen::generator::generate_schedule;

use crate::applied_payment::applied_payment::PaymentStatus;
use crate::quote::params::{PaymentConfig, ScheduleParameters};

/// Whether a generated `Schedule` represents the loan's original plan or
/// one that has since been rescheduled; purely informational, carried
/// through so callers don't have to track it separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleType {
    Original,
    Rescheduled,
}

/// The top-level output of `generate`: the day-by-day schedule plus the
/// summary figures a caller typically wants alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_items: Vec<ScheduleItem>,
    pub final_scheduled_payment_day: Option<OffsetDay>,
    pub final_scheduled_payment_count: usize,
    pub final_actual_payment_count: usize,
    pub final_apr: Option<(AprSolution, Option<Percent>)>,
    pub final_cost_to_borrowing_ratio: Percent,
    pub effective_interest_rate: Rate,
}

/// Build the full schedule for a loan: resolve the scheduled-payment plan,
/// merge it with actual payments into applied-payment events, and fold the
/// amortisation engine over them. Returns `None` iff the resolved schedule
/// has no events at all (an empty `ScheduleConfig`).
///
/// `trim_end` drops trailing `NoLongerRequired` rows once the balance has
/// closed, which reschedule/rollover callers want so a revised plan doesn't
/// carry the old plan's dead tail.
pub fn generate(
    params: &ScheduleParameters,
    payment_config: &PaymentConfig,
    intended_purpose: IntendedPurpose,
    _schedule_type: ScheduleType,
    trim_end: bool,
) -> Result<Option<Schedule>, GenerationError> {
    let fees_total = params.fees_total();
    let scheduled_payments = generate_schedule(
        &payment_config.schedule_config,
        params.principal,
        fees_total,
        params.start_date,
        &params.interest_config,
        params.rounding,
    )?;

    let as_of_day = params.as_of_day();
    let applied_payments = build_applied_payments(
        &scheduled_payments,
        &payment_config.actual_payments,
        params.start_date,
        as_of_day,
        intended_purpose,
        &params.charge_config,
        params.payment_timeout,
    );

    if applied_payments.is_empty() {
        return Ok(None);
    }

    let mut schedule_items = amortise(
        &applied_payments,
        params.principal,
        fees_total,
        params.start_date,
        &params.interest_config,
        &params.fee_config,
        params.rounding,
    );

    if trim_end {
        while matches!(
            schedule_items.last().map(|item| item.payment_status),
            Some(PaymentStatus::NoLongerRequired)
        ) {
            schedule_items.pop();
        }
    }

    let final_scheduled_payment_day = scheduled_payments.keys().max().copied();
    let final_actual_payment_count = payment_config
        .actual_payments
        .values()
        .map(Vec::len)
        .sum();

    let transfers = transfer_list(&payment_config.actual_payments);
    let final_apr = if transfers.is_empty() {
        None
    } else {
        solve_apr(params.principal, &transfers, params.apr_method, params.periods_per_year)
            .ok()
            .map(|solution| (solution, Some(solution.annual_percentage_rate)))
    };

    let total_interest: Cent = schedule_items.iter().map(|item| item.interest_paid).sum();
    let total_fees: Cent = schedule_items.iter().map(|item| item.fees_paid).sum();
    let total_charges: Cent = schedule_items.iter().map(|item| item.charges_paid).sum();
    let final_cost_to_borrowing_ratio = cost_to_borrowing_ratio(
        total_interest + total_fees + total_charges,
        params.principal,
    );

    let effective_interest_rate = effective_rate(
        total_interest,
        params.principal,
        final_scheduled_payment_day,
    );

    Ok(Some(Schedule {
        schedule_items,
        final_scheduled_payment_day,
        final_scheduled_payment_count: scheduled_payments.len(),
        final_actual_payment_count,
        final_apr,
        final_cost_to_borrowing_ratio,
        effective_interest_rate,
    }))
}

/// The payment leg of the APR equation's cash-flow series; the advance
/// itself is passed to `solve_apr` separately.
fn transfer_list(
    actual_payments: &std::collections::BTreeMap<OffsetDay, Vec<crate::applied_payment::actual_payment::ActualPayment>>,
) -> Vec<Transfer> {
    actual_payments
        .iter()
        .filter_map(|(day, payments)| {
            let confirmed: Cent = payments.iter().map(|p| p.status.confirmed_amount()).sum();
            confirmed.is_positive().then_some(Transfer { day: *day, amount: confirmed })
        })
        .collect()
}

/// `(interest + fees + charges paid) / principal`, the fraction of the
/// amount borrowed that the cost of credit represents.
fn cost_to_borrowing_ratio(total_cost: Cent, principal: Cent) -> Percent {
    if principal.is_zero() {
        return Percent::ZERO;
    }
    Percent::from_decimal(
        rust_decimal::Decimal::from(total_cost.value()) / rust_decimal::Decimal::from(principal.value()),
    )
}

/// The annualised rate the total interest charged represents against the
/// principal over the loan's scheduled lifetime: `interest / principal *
/// 365 / lifetime_days`. Degenerates to zero for a same-day or empty plan.
fn effective_rate(total_interest: Cent, principal: Cent, final_day: Option<OffsetDay>) -> Rate {
    let lifetime_days = final_day.map(|day| day.value()).unwrap_or(0);
    if principal.is_zero() || lifetime_days <= 0 {
        return Rate::Annual(Percent::ZERO);
    }
    let ratio = rust_decimal::Decimal::from(total_interest.value()) / rust_decimal::Decimal::from(principal.value());
    let annualised = ratio * rust_decimal::Decimal::from(365) / rust_decimal::Decimal::from(lifetime_days);
    Rate::Annual(Percent::from_decimal(annualised))
}
