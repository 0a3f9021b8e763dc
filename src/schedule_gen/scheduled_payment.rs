use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::calendar::offset::OffsetDay;
use crate::money::cent::Cent;
use crate::unit_period::config::UnitPeriodConfig;

/// Which kind of scheduled entry is in force on a given day, used by the
/// engine to decide whether to advance the payment `window`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledPaymentKind {
    None,
    Original,
    Rescheduled,
}

/// An intended due amount on a specific day. A rescheduled amount overrides
/// the original from its `reschedule_day` forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPayment {
    pub original: Option<Cent>,
    pub rescheduled: Option<(Cent, OffsetDay)>,
    pub adjustment: Cent,
    #[serde(default)]
    pub metadata: Value,
}

impl ScheduledPayment {
    pub fn original_only(amount: Cent) -> ScheduledPayment {
        ScheduledPayment {
            original: Some(amount),
            rescheduled: None,
            adjustment: Cent::ZERO,
            metadata: Value::Null,
        }
    }

    /// The in-force base amount on `day`: the rescheduled amount once
    /// `day >= reschedule_day`, otherwise the original.
    fn base_amount(&self, day: OffsetDay) -> Option<Cent> {
        match self.rescheduled {
            Some((amount, reschedule_day)) if day >= reschedule_day => Some(amount),
            _ => self.original,
        }
    }

    /// `max(0, original ∪ rescheduled) + adjustment`.
    pub fn total_on(&self, day: OffsetDay) -> Cent {
        self.base_amount(day).unwrap_or(Cent::ZERO).at_least_zero() + self.adjustment
    }

    pub fn kind_on(&self, day: OffsetDay) -> ScheduledPaymentKind {
        match self.rescheduled {
            Some((_, reschedule_day)) if day >= reschedule_day => ScheduledPaymentKind::Rescheduled,
            _ if self.original.is_some() => ScheduledPaymentKind::Original,
            _ => ScheduledPaymentKind::None,
        }
    }
}

/// A single entry of a `FixedSchedules` plan: a block of `payment_count`
/// payments of `payment_amount`, spaced per `unit_period_config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedScheduleEntry {
    pub unit_period_config: UnitPeriodConfig,
    pub payment_count: usize,
    pub payment_amount: Cent,
}

/// How scheduled payments are determined for a loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScheduleConfig {
    AutoGenerate {
        unit_period_config: UnitPeriodConfig,
        payment_count: usize,
        max_duration: Option<crate::calendar::offset::DurationDay>,
    },
    FixedSchedules(Vec<FixedScheduleEntry>),
    CustomSchedule(BTreeMap<OffsetDay, ScheduledPayment>),
}
