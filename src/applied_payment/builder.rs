use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::calendar::offset::{DurationDay, OffsetDay};
use crate::fees::charge::ChargeConfig;
use crate::schedule_gen::scheduled_payment::ScheduledPayment;

use super::actual_payment::ActualPayment;
use super::applied_payment::{AppliedPayment, GeneratedPayment, IntendedPurpose, PaymentStatus};

/// Merge scheduled, actual and (if applicable) synthetic settlement payment
/// events into one `AppliedPayment` per active day, classifying each day's
/// `PaymentStatus` per the builder's priority rules.
#[allow(clippy::too_many_arguments)]
pub fn build_applied_payments(
    scheduled_payments: &BTreeMap<OffsetDay, ScheduledPayment>,
    actual_payments: &BTreeMap<OffsetDay, Vec<ActualPayment>>,
    start_date: NaiveDate,
    as_of_day: OffsetDay,
    intended_purpose: IntendedPurpose,
    charge_config: &ChargeConfig,
    payment_timeout: DurationDay,
) -> Vec<AppliedPayment> {
    let settlement_day = intended_purpose.settlement_day(as_of_day);

    let mut days: BTreeSet<OffsetDay> = scheduled_payments.keys().copied().collect();
    days.extend(actual_payments.keys().copied());
    if let Some(day) = settlement_day {
        days.insert(day);
    }

    days.into_iter()
        .map(|day| {
            build_day(
                day,
                scheduled_payments.get(&day),
                actual_payments.get(&day).map(Vec::as_slice).unwrap_or(&[]),
                start_date,
                as_of_day,
                settlement_day,
                intended_purpose,
                charge_config,
                payment_timeout,
            )
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn build_day(
    day: OffsetDay,
    scheduled: Option<&ScheduledPayment>,
    raw_actuals: &[ActualPayment],
    start_date: NaiveDate,
    as_of_day: OffsetDay,
    settlement_day: Option<OffsetDay>,
    _intended_purpose: IntendedPurpose,
    charge_config: &ChargeConfig,
    payment_timeout: DurationDay,
) -> AppliedPayment {
    let actual_payments: Vec<ActualPayment> = raw_actuals
        .iter()
        .map(|payment| payment.reclassify_timeout(day, as_of_day, payment_timeout))
        .collect();

    let confirmed = actual_payments
        .iter()
        .map(|p| p.status.confirmed_amount())
        .fold(crate::money::cent::Cent::ZERO, |acc, x| acc + x);
    let pending = actual_payments
        .iter()
        .map(|p| p.status.pending_amount())
        .fold(crate::money::cent::Cent::ZERO, |acc, x| acc + x);

    let scheduled_total = scheduled
        .map(|sp| sp.total_on(day))
        .unwrap_or(crate::money::cent::Cent::ZERO);

    let settlement_today = settlement_day == Some(as_of_day) && day == as_of_day;

    let (mut status, mut net_effect) = classify(
        scheduled_total,
        confirmed,
        pending,
        day,
        as_of_day,
        charge_config.late_payment_grace_period,
        settlement_today,
    );

    let mut generated_payment = GeneratedPayment::None;
    if settlement_day == Some(day) {
        if matches!(status, PaymentStatus::NoneScheduled) && scheduled.is_none() && raw_actuals.is_empty() {
            // A synthetic day inserted purely to host the settlement slot.
            status = PaymentStatus::Generated;
            net_effect = crate::money::cent::Cent::ZERO;
        }
        generated_payment = GeneratedPayment::ToBeGenerated;
    }

    let failed_charges: Vec<_> = actual_payments
        .iter()
        .flat_map(|p| p.status.failed_charges().iter().cloned())
        .map(|charge| {
            let base = scheduled_total.at_least_zero();
            let amount = charge.amount().evaluate(base);
            (charge, amount)
        })
        .collect();

    let mut incurred = failed_charges;
    let in_late_charge_grace =
        day + charge_config.late_payment_grace_period >= as_of_day;
    if matches!(status, PaymentStatus::MissedPayment | PaymentStatus::Underpayment)
        && !charge_config.is_holiday(day.to_date(start_date))
        && !in_late_charge_grace
    {
        let underpayment = (scheduled_total - confirmed).at_least_zero();
        if let Some(charge) = charge_config.late_payment_charge(underpayment) {
            incurred.push(charge);
        }
    }
    let incurred_charges = charge_config.combine(incurred);

    AppliedPayment {
        offset_day: day,
        scheduled_payment: scheduled.cloned(),
        actual_payments,
        generated_payment,
        incurred_charges,
        net_effect,
        payment_status: status,
    }
}

#[allow(clippy::too_many_arguments)]
fn classify(
    s: crate::money::cent::Cent,
    c: crate::money::cent::Cent,
    pending: crate::money::cent::Cent,
    day: OffsetDay,
    as_of_day: OffsetDay,
    grace_period: DurationDay,
    settlement_today: bool,
) -> (PaymentStatus, crate::money::cent::Cent) {
    use crate::money::cent::Cent;

    if pending.is_positive() {
        return (PaymentStatus::PaymentPending, pending + c);
    }
    if s.is_zero() && c.is_zero() {
        return (PaymentStatus::NoneScheduled, Cent::ZERO);
    }
    if s.is_zero() && c.is_negative() {
        return (PaymentStatus::Refunded, c);
    }
    if s.is_zero() {
        return (PaymentStatus::ExtraPayment, c);
    }

    let still_in_grace = day <= as_of_day && (day + grace_period) >= as_of_day;
    if c < s && still_in_grace {
        if settlement_today {
            return (PaymentStatus::Generated, Cent::ZERO);
        }
        return (PaymentStatus::PaymentDue, s);
    }
    if day > as_of_day {
        return (PaymentStatus::NotYetDue, s);
    }
    if c.is_zero() {
        return (PaymentStatus::MissedPayment, Cent::ZERO);
    }
    if c < s {
        return (PaymentStatus::Underpayment, c);
    }
    if c > s {
        return (PaymentStatus::Overpayment, c);
    }
    (PaymentStatus::PaymentMade, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applied_payment::actual_payment::ActualPaymentStatus;
    use crate::fees::charge::ChargeGrouping;
    use crate::money::cent::Cent;

    fn no_charges() -> ChargeConfig {
        ChargeConfig {
            charge_types: vec![],
            charge_holidays: vec![],
            charge_grouping: ChargeGrouping::AllChargesApplied,
            late_payment_grace_period: DurationDay::new(0),
        }
    }

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn no_scheduled_no_actual_is_none_scheduled() {
        let scheduled = BTreeMap::new();
        let actuals = BTreeMap::new();
        let applied = build_applied_payments(
            &scheduled,
            &actuals,
            start(),
            OffsetDay::new(0),
            IntendedPurpose::Statement,
            &no_charges(),
            DurationDay::new(30),
        );
        assert!(applied.is_empty());
    }

    #[test]
    fn underpayment_classified_when_partially_paid_past_as_of_day() {
        let mut scheduled = BTreeMap::new();
        scheduled.insert(OffsetDay::new(30), ScheduledPayment::original_only(Cent::new(10_000)));
        let mut actuals = BTreeMap::new();
        actuals.insert(
            OffsetDay::new(30),
            vec![ActualPayment::new(ActualPaymentStatus::Confirmed(Cent::new(6_000)))],
        );
        let applied = build_applied_payments(
            &scheduled,
            &actuals,
            start(),
            OffsetDay::new(45),
            IntendedPurpose::Statement,
            &no_charges(),
            DurationDay::new(30),
        );
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].payment_status, PaymentStatus::Underpayment);
        assert_eq!(applied[0].net_effect, Cent::new(6_000));
    }

    #[test]
    fn missed_payment_when_nothing_paid_past_as_of_day() {
        let mut scheduled = BTreeMap::new();
        scheduled.insert(OffsetDay::new(30), ScheduledPayment::original_only(Cent::new(10_000)));
        let applied = build_applied_payments(
            &scheduled,
            &BTreeMap::new(),
            start(),
            OffsetDay::new(45),
            IntendedPurpose::Statement,
            &no_charges(),
            DurationDay::new(30),
        );
        assert_eq!(applied[0].payment_status, PaymentStatus::MissedPayment);
    }

    #[test]
    fn not_yet_due_for_future_scheduled_payment() {
        let mut scheduled = BTreeMap::new();
        scheduled.insert(OffsetDay::new(60), ScheduledPayment::original_only(Cent::new(10_000)));
        let applied = build_applied_payments(
            &scheduled,
            &BTreeMap::new(),
            start(),
            OffsetDay::new(10),
            IntendedPurpose::Statement,
            &no_charges(),
            DurationDay::new(30),
        );
        assert_eq!(applied[0].payment_status, PaymentStatus::NotYetDue);
        assert_eq!(applied[0].net_effect, Cent::new(10_000));
    }

    #[test]
    fn settlement_day_gets_a_synthetic_generated_slot() {
        let applied = build_applied_payments(
            &BTreeMap::new(),
            &BTreeMap::new(),
            start(),
            OffsetDay::new(90),
            IntendedPurpose::SettlementOnAsOfDay,
            &no_charges(),
            DurationDay::new(30),
        );
        assert_eq!(applied.len(), 1);
        assert_eq!(applied[0].payment_status, PaymentStatus::Generated);
        assert_eq!(applied[0].generated_payment, GeneratedPayment::ToBeGenerated);
    }

    #[test]
    fn pending_payment_takes_priority_over_due_classification() {
        let mut scheduled = BTreeMap::new();
        scheduled.insert(OffsetDay::new(30), ScheduledPayment::original_only(Cent::new(10_000)));
        let mut actuals = BTreeMap::new();
        actuals.insert(
            OffsetDay::new(30),
            vec![ActualPayment::new(ActualPaymentStatus::Pending(Cent::new(10_000)))],
        );
        let applied = build_applied_payments(
            &scheduled,
            &actuals,
            start(),
            OffsetDay::new(30),
            IntendedPurpose::Statement,
            &no_charges(),
            DurationDay::new(30),
        );
        assert_eq!(applied[0].payment_status, PaymentStatus::PaymentPending);
    }
}
