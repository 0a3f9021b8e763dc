use serde::{Deserialize, Serialize};

use crate::applied_payment::applied_payment::{IntendedPurpose, PaymentStatus};
use crate::applied_payment::builder::build_applied_payments;
use crate::calendar::offset::OffsetDay;
use crate::engine::amortise::amortise;
use crate::engine::schedule_item::ScheduleItem;
use crate::error::GenerationError;
use crate::money::cent::Cent;
use crate::schedule_gen::generator::generate_schedule;

use super::params::{PaymentConfig, ScheduleParameters};

/// A breakdown of an amount into the four apportionment buckets, in the
/// order they're settled: charges, interest, fees, principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Apportionment {
    pub charges: Cent,
    pub interest: Cent,
    pub fees: Cent,
    pub principal: Cent,
}

impl Apportionment {
    pub fn total(&self) -> Cent {
        self.charges + self.interest + self.fees + self.principal
    }
}

/// A single payment that, if made on the quoted day, closes the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub payment_value: Cent,
    pub apportionment: Apportionment,
    pub fees_refund_if_settled: Cent,
}

/// The outcome of asking for a settlement figure. Mirrors the engine's own
/// total-function contract: no panics, every input resolves to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteOutcome {
    PaymentQuote(PaymentQuote),
    AwaitPaymentConfirmation,
    UnableToGenerateQuote,
}

/// A quote together with both schedules that produced it: the loan's
/// statement-mode schedule as it stands, and the schedule as it would run
/// under the requested settlement purpose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub outcome: QuoteOutcome,
    pub current_schedule: Vec<ScheduleItem>,
    pub revised_schedule: Vec<ScheduleItem>,
}

fn run_schedule(
    params: &ScheduleParameters,
    payment_config: &PaymentConfig,
    intended_purpose: IntendedPurpose,
) -> Result<(Vec<ScheduleItem>, OffsetDay), GenerationError> {
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

    let schedule = amortise(
        &applied_payments,
        params.principal,
        fees_total,
        params.start_date,
        &params.interest_config,
        &params.fee_config,
        params.rounding,
    );

    Ok((schedule, as_of_day))
}

/// Run the engine once in `Statement` mode (the loan's schedule as it
/// stands) and once more under `intended_purpose` (the requested
/// settlement quote), then read the quote off the generated-payment day.
pub fn get_quote(
    params: &ScheduleParameters,
    payment_config: &PaymentConfig,
    intended_purpose: IntendedPurpose,
) -> Result<Quote, GenerationError> {
    let (current_schedule, _) = run_schedule(params, payment_config, IntendedPurpose::Statement)?;
    let (revised_schedule, as_of_day) = run_schedule(params, payment_config, intended_purpose)?;

    let any_pending = revised_schedule
        .iter()
        .any(|item| matches!(item.payment_status, PaymentStatus::PaymentPending));

    let outcome = if any_pending {
        tracing::info!("quote blocked: payments still pending confirmation");
        QuoteOutcome::AwaitPaymentConfirmation
    } else {
        let settlement_day = intended_purpose.settlement_day(as_of_day);
        let slot = settlement_day.and_then(|day| revised_schedule.iter().find(|item| item.offset_day == day));
        match slot {
            // The generated-payment slot carries zero `net_effect`, so
            // everything it owes sits unpaid in its closing figures; the
            // engine has already computed what paying it off in full would
            // take in `settlement_figure`, apportioned charges -> interest
            // -> fees -> principal, net of any pro-rata fee refund.
            Some(item) => QuoteOutcome::PaymentQuote(PaymentQuote {
                payment_value: item.settlement_figure,
                apportionment: Apportionment {
                    charges: item.closing_charges_balance,
                    interest: item.closing_interest_balance.round(params.rounding),
                    fees: item.closing_fees_balance - item.fees_refund_if_settled,
                    principal: item.closing_principal_balance,
                },
                fees_refund_if_settled: item.fees_refund_if_settled,
            }),
            None => QuoteOutcome::UnableToGenerateQuote,
        }
    };

    Ok(Quote {
        outcome,
        current_schedule,
        revised_schedule,
    })
}
