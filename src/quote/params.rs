use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::apr::method::AprMethod;
use crate::applied_payment::actual_payment::ActualPayment;
use crate::calendar::offset::{DurationDay, OffsetDay};
use crate::fees::charge::ChargeConfig;
use crate::fees::config::FeeConfig;
use crate::interest::config::InterestConfig;
use crate::money::cent::Cent;
use crate::money::rounding::Rounding;
use crate::schedule_gen::scheduled_payment::ScheduleConfig;

/// The fixed terms of a loan: everything that doesn't change as payments
/// come in, as opposed to `PaymentConfig` which does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleParameters {
    pub principal: Cent,
    pub start_date: NaiveDate,
    /// The date this schedule is being computed as of; drives the
    /// applied-payment builder's `Pending` timeout and due/missed
    /// classification. Must be `>= start_date`.
    pub as_of_date: NaiveDate,
    pub interest_config: InterestConfig,
    pub fee_config: FeeConfig,
    pub charge_config: ChargeConfig,
    pub payment_timeout: DurationDay,
    pub rounding: Rounding,
    pub apr_method: AprMethod,
    pub periods_per_year: rust_decimal::Decimal,
}

impl ScheduleParameters {
    pub fn fees_total(&self) -> Cent {
        self.fee_config.fees_total(self.principal)
    }

    pub fn as_of_day(&self) -> OffsetDay {
        OffsetDay::of(self.start_date, self.as_of_date)
    }
}

/// How a minimum required payment is determined when quoting what's due.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MinimumPaymentPolicy {
    None,
    FixedAmount(Cent),
    PercentageOfBalance(crate::money::percent::Percent),
}

impl MinimumPaymentPolicy {
    pub fn minimum_on(&self, balance: Cent) -> Cent {
        match self {
            MinimumPaymentPolicy::None => Cent::ZERO,
            MinimumPaymentPolicy::FixedAmount(amount) => *amount,
            MinimumPaymentPolicy::PercentageOfBalance(rate) => rate.of_rounded(balance, Rounding::Up),
        }
    }
}

/// Whether the engine should project the borrower's remaining contractual
/// schedule, or stop cold at `as_of_day` (a settlement quote).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledPaymentOption {
    ProjectRemainingSchedule,
    AsOfDayOnly,
}

/// How the outstanding balance should be treated when it's being closed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CloseBalanceOption {
    SettleInFull,
    WriteOffRemainder,
}

/// The variable part of a loan's state: what's scheduled and what's actually
/// come in so far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub schedule_config: ScheduleConfig,
    pub actual_payments: BTreeMap<OffsetDay, Vec<ActualPayment>>,
}
