use serde::{Deserialize, Serialize};

use crate::calendar::offset::OffsetDay;
use crate::fees::charge::Charge;
use crate::money::cent::Cent;
use crate::schedule_gen::scheduled_payment::ScheduledPayment;

use super::actual_payment::ActualPayment;

/// Classification of a day's payment activity. Terminal for the day: each
/// `AppliedPayment` carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    NoneScheduled,
    NotYetDue,
    PaymentDue,
    PaymentPending,
    PaymentMade,
    NothingDue,
    Underpayment,
    Overpayment,
    ExtraPayment,
    MissedPayment,
    PaidLaterInFull,
    PaidLaterOwing(Cent),
    Refunded,
    Generated,
    NoLongerRequired,
    InformationOnly,
}

/// Whether a generated (synthetic settlement) payment is in play for a day,
/// and if so, its value once the engine has computed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneratedPayment {
    None,
    ToBeGenerated,
    Generated(Cent),
}

impl GeneratedPayment {
    pub fn value(&self) -> Cent {
        match self {
            GeneratedPayment::Generated(amount) => *amount,
            _ => Cent::ZERO,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, GeneratedPayment::ToBeGenerated)
    }
}

/// The mode the engine and applied-payment builder run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntendedPurpose {
    Statement,
    SettlementOn(OffsetDay),
    SettlementOnAsOfDay,
}

impl IntendedPurpose {
    /// The day a generated settlement payment slot should be placed on,
    /// relative to `as_of_day`.
    pub fn settlement_day(&self, as_of_day: OffsetDay) -> Option<OffsetDay> {
        match self {
            IntendedPurpose::Statement => None,
            IntendedPurpose::SettlementOn(day) => Some(*day),
            IntendedPurpose::SettlementOnAsOfDay => Some(as_of_day),
        }
    }
}

/// The per-day aggregate of scheduled + actual + generated payment events,
/// the unit of input the amortisation engine folds over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppliedPayment {
    pub offset_day: OffsetDay,
    pub scheduled_payment: Option<ScheduledPayment>,
    pub actual_payments: Vec<ActualPayment>,
    pub generated_payment: GeneratedPayment,
    pub incurred_charges: Vec<(Charge, Cent)>,
    pub net_effect: Cent,
    pub payment_status: PaymentStatus,
}

impl AppliedPayment {
    pub fn confirmed(&self) -> Cent {
        self.actual_payments
            .iter()
            .map(|payment| payment.status.confirmed_amount())
            .fold(Cent::ZERO, |acc, x| acc + x)
    }

    pub fn pending(&self) -> Cent {
        self.actual_payments
            .iter()
            .map(|payment| payment.status.pending_amount())
            .fold(Cent::ZERO, |acc, x| acc + x)
    }

    pub fn has_pending(&self) -> bool {
        self.pending().is_positive() || self.generated_payment.is_pending()
    }
}
