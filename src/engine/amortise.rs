use chrono::NaiveDate;

use crate::applied_payment::actual_payment::ActualPaymentStatus;
use crate::applied_payment::applied_payment::{AppliedPayment, PaymentStatus};
use crate::fees::config::FeeConfig;
use crate::interest::accrual::accrue_interest;
use crate::interest::config::InterestConfig;
use crate::money::cent::Cent;
use crate::money::decimal_cent::DecimalCent;
use crate::money::rounding::Rounding;
use crate::schedule_gen::scheduled_payment::ScheduledPaymentKind;

use super::accumulator::Accumulator;
use super::schedule_item::{BalanceStatus, ScheduleItem};

/// Fold `applied_payments` (assumed sorted ascending by `offset_day`) into
/// one `ScheduleItem` per day: accrue interest since the previous entry,
/// apply the lifetime interest cap, then apportion the day's net payment
/// charges first, then interest, then fees, then principal.
pub fn amortise(
    applied_payments: &[AppliedPayment],
    principal: Cent,
    fees_total: Cent,
    start_date: NaiveDate,
    interest_config: &InterestConfig,
    fee_config: &FeeConfig,
    rounding: Rounding,
) -> Vec<ScheduleItem> {
    let mut accumulator = Accumulator::new(principal, fees_total, start_date, false);
    let fees_percentage = fee_config.fees_percentage(principal);
    let mut items = Vec::with_capacity(applied_payments.len());
    let final_day = applied_payments.last().map(|applied| applied.offset_day);
    let mut closed = false;

    for applied in applied_payments {
        if closed {
            // Once the balance has closed, every later day is inert: zero
            // portions, status frozen at NoLongerRequired.
            items.push(ScheduleItem {
                offset_day: applied.offset_day,
                window: accumulator.window,
                opening_balance: accumulator.total_owed(),
                interest_charged: DecimalCent::ZERO,
                charges_charged: Cent::ZERO,
                payment_status: PaymentStatus::NoLongerRequired,
                charges_paid: Cent::ZERO,
                interest_paid: Cent::ZERO,
                fees_paid: Cent::ZERO,
                principal_paid: Cent::ZERO,
                underpayment: Cent::ZERO,
                closing_principal_balance: accumulator.principal_balance,
                closing_fees_balance: accumulator.fees_balance,
                closing_charges_balance: accumulator.charges_balance,
                closing_interest_balance: accumulator.interest_balance,
                closing_balance: accumulator.total_owed(),
                balance_status: BalanceStatus::Settled,
                fees_refund_if_settled: Cent::ZERO,
                settlement_figure: Cent::ZERO,
            });
            continue;
        }

        let opening_balance = accumulator.total_owed();
        let current_date = applied.offset_day.to_date(start_date);
        let accrual_base = accumulator.accrual_base();
        let span_days = (current_date - accumulator.last_date).num_days().max(0);

        let kind = applied
            .scheduled_payment
            .as_ref()
            .map(|scheduled| scheduled.kind_on(applied.offset_day))
            .unwrap_or(ScheduledPaymentKind::None);
        if matches!(kind, ScheduledPaymentKind::Original | ScheduledPaymentKind::Rescheduled) {
            accumulator.window += 1;
        }

        // A balance paid ahead earns (or rather, credits) at the negative-
        // balance rate instead of the standard/promotional schedule.
        let accrued = if accrual_base.is_negative() {
            let rate = interest_config.rate_on_negative_balance().to_daily();
            accrue_interest(accrual_base, None, &vec![rate; span_days as usize])
        } else {
            let rates = interest_config.daily_rates(
                accumulator.last_date,
                current_date,
                start_date,
                accumulator.in_grace_settlement,
            );
            accrue_interest(accrual_base, interest_config.cap.daily, &rates)
        };
        let new_interest = if !accrual_base.is_negative() {
            match interest_config.cap.total_cap(principal) {
                Some(cap) => {
                    let remaining_cap =
                        (DecimalCent::from_cent(cap) - accumulator.cumulative_interest_charged).at_least_zero();
                    accrued.min(remaining_cap)
                }
                None => accrued,
            }
        } else {
            accrued
        };
        // Carried fractional, never rounded here: the residue only gets
        // rounded away at the point cents actually change hands below, and
        // the leftover is folded straight back into interest_balance.
        accumulator.interest_balance += new_interest;
        accumulator.cumulative_interest_charged += new_interest;
        accumulator.last_date = current_date;

        let new_charges = applied
            .incurred_charges
            .iter()
            .map(|(_, amount)| *amount)
            .fold(Cent::ZERO, |acc, x| acc + x);
        let charges_due = (new_charges + accumulator.charges_balance).at_least_zero();

        let mut remaining = applied.net_effect.at_least_zero();

        let charges_paid = remaining.min(charges_due);
        remaining -= charges_paid;
        accumulator.charges_balance = charges_due - charges_paid;

        let interest_due = accumulator.interest_balance.at_least_zero().round(rounding);
        let interest_paid = remaining.min(interest_due);
        remaining -= interest_paid;

        let (fees_paid, principal_assignable) =
            fee_config.apportion(remaining, accumulator.fees_balance, fees_percentage);
        let principal_paid = principal_assignable;

        accumulator.interest_balance -= DecimalCent::from_cent(interest_paid);
        accumulator.fees_balance -= fees_paid;
        accumulator.principal_balance -= principal_paid;

        let wrote_off = applied
            .actual_payments
            .iter()
            .any(|payment| matches!(payment.status, ActualPaymentStatus::WriteOff(_)));

        let closing_balance = accumulator.total_owed();
        let balance_status = if wrote_off && closing_balance.is_zero() {
            BalanceStatus::WrittenOff
        } else if closing_balance.is_negative() {
            BalanceStatus::PaidAhead
        } else if closing_balance.is_zero() {
            BalanceStatus::Settled
        } else {
            BalanceStatus::Normal
        };

        let underpayment = match applied.payment_status {
            PaymentStatus::MissedPayment | PaymentStatus::Underpayment | PaymentStatus::PaidLaterOwing(_) => {
                let payment_due = applied
                    .scheduled_payment
                    .as_ref()
                    .map(|sp| sp.total_on(applied.offset_day))
                    .unwrap_or(Cent::ZERO)
                    + new_charges;
                (payment_due - applied.net_effect).at_least_zero()
            }
            _ => Cent::ZERO,
        };

        let fees_refund_if_settled = fee_config.settlement_refund.refund_on(
            accumulator.fees_balance,
            fees_total,
            applied.offset_day,
            final_day,
            rounding,
        );

        // What paying this off in full, today, would take: outstanding
        // charges, interest, fees net of the settlement refund, and
        // principal.
        let settlement_figure = (DecimalCent::from_cent(accumulator.charges_balance)
            + accumulator.interest_balance
            + DecimalCent::from_cent(accumulator.fees_balance - fees_refund_if_settled)
            + DecimalCent::from_cent(accumulator.principal_balance))
        .round(rounding)
        .at_least_zero();

        items.push(ScheduleItem {
            offset_day: applied.offset_day,
            window: accumulator.window,
            opening_balance,
            interest_charged: new_interest,
            charges_charged: new_charges,
            payment_status: applied.payment_status,
            charges_paid,
            interest_paid,
            fees_paid,
            principal_paid,
            underpayment,
            closing_principal_balance: accumulator.principal_balance,
            closing_fees_balance: accumulator.fees_balance,
            closing_charges_balance: accumulator.charges_balance,
            closing_interest_balance: accumulator.interest_balance,
            closing_balance,
            balance_status,
            fees_refund_if_settled,
            settlement_figure,
        });

        if matches!(balance_status, BalanceStatus::PaidAhead) {
            accumulator.in_grace_settlement = false;
        }
        if matches!(balance_status, BalanceStatus::Settled | BalanceStatus::WrittenOff) {
            closed = true;
        }
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::offset::{DurationDay, OffsetDay};
    use crate::fees::config::{FeeAmortisation, SettlementRefund};
    use crate::interest::config::{Cap, InterestMethod};
    use crate::money::percent::{Percent, Rate};
    use crate::schedule_gen::scheduled_payment::ScheduledPayment;
    use rust_decimal_macros::dec;

    fn interest_config() -> InterestConfig {
        InterestConfig {
            method: InterestMethod::Simple,
            standard_rate: Rate::Daily(Percent::from_decimal(dec!(0.001))),
            cap: Cap { daily: None, total: None },
            initial_grace_period: DurationDay::new(0),
            promotional_rates: vec![],
            rate_on_negative_balance: None,
        }
    }

    fn no_fees() -> FeeConfig {
        FeeConfig {
            fee_types: vec![],
            rounding: Rounding::HalfAwayFromZero,
            fee_amortisation: FeeAmortisation::AmortiseBeforePrincipal,
            settlement_refund: SettlementRefund::None,
        }
    }

    fn paid_in_full(day: i64, scheduled: Cent, paid: Cent) -> AppliedPayment {
        AppliedPayment {
            offset_day: OffsetDay::new(day),
            scheduled_payment: Some(ScheduledPayment::original_only(scheduled)),
            actual_payments: vec![],
            generated_payment: crate::applied_payment::applied_payment::GeneratedPayment::None,
            incurred_charges: vec![],
            net_effect: paid,
            payment_status: PaymentStatus::PaymentMade,
        }
    }

    #[test]
    fn full_payment_reduces_principal_after_interest() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let applied = vec![paid_in_full(30, Cent::new(10_300), Cent::new(10_300))];
        let items = amortise(
            &applied,
            Cent::new(100_000),
            Cent::ZERO,
            start,
            &interest_config(),
            &no_fees(),
            Rounding::HalfAwayFromZero,
        );
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.interest_charged, DecimalCent::from_cent(Cent::new(3_000)));
        assert_eq!(item.interest_paid, Cent::new(3_000));
        assert_eq!(item.principal_paid, Cent::new(7_300));
        assert_eq!(item.closing_principal_balance, Cent::new(92_700));
        assert_eq!(item.balance_status, BalanceStatus::Normal);
    }

    #[test]
    fn missed_payment_leaves_underpayment_and_unpaid_interest() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let applied = vec![AppliedPayment {
            offset_day: OffsetDay::new(30),
            scheduled_payment: Some(ScheduledPayment::original_only(Cent::new(10_300))),
            actual_payments: vec![],
            generated_payment: crate::applied_payment::applied_payment::GeneratedPayment::None,
            incurred_charges: vec![],
            net_effect: Cent::ZERO,
            payment_status: PaymentStatus::MissedPayment,
        }];
        let items = amortise(
            &applied,
            Cent::new(100_000),
            Cent::ZERO,
            start,
            &interest_config(),
            &no_fees(),
            Rounding::HalfAwayFromZero,
        );
        let item = &items[0];
        assert_eq!(item.underpayment, Cent::new(10_300));
        assert_eq!(item.closing_interest_balance, DecimalCent::from_cent(Cent::new(3_000)));
        assert_eq!(item.closing_principal_balance, Cent::new(100_000));
    }

    #[test]
    fn writeoff_with_zero_remaining_balance_marks_written_off() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let applied = vec![AppliedPayment {
            offset_day: OffsetDay::new(30),
            scheduled_payment: None,
            actual_payments: vec![crate::applied_payment::actual_payment::ActualPayment::new(
                ActualPaymentStatus::WriteOff(Cent::new(103_000)),
            )],
            generated_payment: crate::applied_payment::applied_payment::GeneratedPayment::None,
            incurred_charges: vec![],
            net_effect: Cent::new(103_000),
            payment_status: PaymentStatus::PaymentMade,
        }];
        let items = amortise(
            &applied,
            Cent::new(100_000),
            Cent::ZERO,
            start,
            &interest_config(),
            &no_fees(),
            Rounding::HalfAwayFromZero,
        );
        assert_eq!(items[0].balance_status, BalanceStatus::WrittenOff);
        assert_eq!(items[0].closing_balance, DecimalCent::ZERO);
    }

    #[test]
    fn days_after_settlement_carry_zero_portions_and_no_longer_required() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let applied = vec![
            paid_in_full(30, Cent::new(103_000), Cent::new(103_000)),
            paid_in_full(60, Cent::new(10_000), Cent::new(10_000)),
        ];
        let items = amortise(
            &applied,
            Cent::new(100_000),
            Cent::ZERO,
            start,
            &interest_config(),
            &no_fees(),
            Rounding::HalfAwayFromZero,
        );
        assert_eq!(items[0].balance_status, BalanceStatus::Settled);
        let tail = &items[1];
        assert_eq!(tail.payment_status, PaymentStatus::NoLongerRequired);
        assert_eq!(tail.principal_paid, Cent::ZERO);
        assert_eq!(tail.interest_paid, Cent::ZERO);
        assert_eq!(tail.closing_balance, DecimalCent::ZERO);
    }

    #[test]
    fn negative_balance_accrues_credit_at_its_own_rate() {
        use crate::money::percent::{Percent, Rate};

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut config = interest_config();
        config.rate_on_negative_balance = Some(Rate::Daily(Percent::from_decimal(dec!(0.0005))));

        let applied = vec![
            paid_in_full(10, Cent::ZERO, Cent::new(15_000)),
            AppliedPayment {
                offset_day: OffsetDay::new(20),
                scheduled_payment: None,
                actual_payments: vec![],
                generated_payment: crate::applied_payment::applied_payment::GeneratedPayment::None,
                incurred_charges: vec![],
                net_effect: Cent::ZERO,
                payment_status: PaymentStatus::NoneScheduled,
            },
        ];
        let items = amortise(&applied, Cent::new(10_000), Cent::ZERO, start, &config, &no_fees(), Rounding::HalfAwayFromZero);

        assert_eq!(items[0].balance_status, BalanceStatus::PaidAhead);
        let credit_day = &items[1];
        assert_eq!(credit_day.interest_charged, DecimalCent::from_cent(Cent::new(-25)));
        assert_eq!(credit_day.closing_interest_balance, DecimalCent::from_cent(Cent::new(-25)));
        assert!(credit_day.closing_balance < items[0].closing_balance);
        assert_eq!(credit_day.balance_status, BalanceStatus::PaidAhead);
    }

    #[test]
    fn unpaid_charges_carry_into_the_next_days_balance() {
        use crate::money::amount::Amount;

        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let late_fee = (
            crate::fees::charge::Charge::LatePayment(Amount::Simple(Cent::new(500))),
            Cent::new(500),
        );
        let applied = vec![
            AppliedPayment {
                offset_day: OffsetDay::new(10),
                scheduled_payment: None,
                actual_payments: vec![],
                generated_payment: crate::applied_payment::applied_payment::GeneratedPayment::None,
                incurred_charges: vec![late_fee.clone()],
                // Not enough to cover the 500-cent charge in full.
                net_effect: Cent::new(100),
                payment_status: PaymentStatus::InformationOnly,
            },
            paid_in_full(20, Cent::new(1_000), Cent::new(1_000)),
        ];
        let items = amortise(
            &applied,
            Cent::new(100_000),
            Cent::ZERO,
            start,
            &interest_config(),
            &no_fees(),
            Rounding::HalfAwayFromZero,
        );
        // Charges are apportioned first: the whole payment goes to charges,
        // leaving a remainder carried into the charges balance.
        assert_eq!(items[0].charges_paid, Cent::new(100));
        assert_eq!(items[0].closing_charges_balance, Cent::new(400));

        // The carried remainder is paid off first on the next day, ahead of
        // interest and principal.
        assert_eq!(items[1].charges_paid, Cent::new(400));
        assert_eq!(items[1].closing_charges_balance, Cent::ZERO);
    }

    #[test]
    fn window_increments_only_on_original_or_rescheduled_scheduled_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let applied = vec![
            AppliedPayment {
                offset_day: OffsetDay::new(5),
                scheduled_payment: None,
                actual_payments: vec![],
                generated_payment: crate::applied_payment::applied_payment::GeneratedPayment::None,
                incurred_charges: vec![],
                net_effect: Cent::ZERO,
                payment_status: PaymentStatus::NoneScheduled,
            },
            paid_in_full(30, Cent::new(10_300), Cent::new(10_300)),
            paid_in_full(60, Cent::new(10_300), Cent::new(10_300)),
        ];
        let items = amortise(
            &applied,
            Cent::new(100_000),
            Cent::ZERO,
            start,
            &interest_config(),
            &no_fees(),
            Rounding::HalfAwayFromZero,
        );
        assert_eq!(items[0].window, 0);
        assert_eq!(items[1].window, 1);
        assert_eq!(items[2].window, 2);
    }

    #[test]
    fn settlement_figure_closes_the_balance_exactly_when_paid_in_full() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let applied = vec![AppliedPayment {
            offset_day: OffsetDay::new(30),
            scheduled_payment: None,
            actual_payments: vec![],
            generated_payment: crate::applied_payment::applied_payment::GeneratedPayment::ToBeGenerated,
            incurred_charges: vec![],
            net_effect: Cent::ZERO,
            payment_status: PaymentStatus::Generated,
        }];
        let items = amortise(
            &applied,
            Cent::new(100_000),
            Cent::ZERO,
            start,
            &interest_config(),
            &no_fees(),
            Rounding::HalfAwayFromZero,
        );
        let settlement_figure = items[0].settlement_figure;
        assert_eq!(settlement_figure, Cent::new(103_000));

        let settled = amortise(
            &[AppliedPayment {
                offset_day: OffsetDay::new(30),
                scheduled_payment: None,
                actual_payments: vec![],
                generated_payment: crate::applied_payment::applied_payment::GeneratedPayment::Generated(settlement_figure),
                incurred_charges: vec![],
                net_effect: settlement_figure,
                payment_status: PaymentStatus::Generated,
            }],
            Cent::new(100_000),
            Cent::ZERO,
            start,
            &interest_config(),
            &no_fees(),
            Rounding::HalfAwayFromZero,
        );
        assert_eq!(settled[0].closing_balance, DecimalCent::ZERO);
        assert_eq!(settled[0].balance_status, BalanceStatus::Settled);
    }
}
