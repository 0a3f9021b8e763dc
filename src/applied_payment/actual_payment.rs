use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::calendar::offset::{DurationDay, OffsetDay};
use crate::fees::charge::Charge;
use crate::money::cent::Cent;

/// The lifecycle state of a single payment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActualPaymentStatus {
    Pending(Cent),
    Confirmed(Cent),
    Failed(Cent, Vec<Charge>),
    WriteOff(Cent),
    TimedOut(Cent),
}

impl ActualPaymentStatus {
    /// The amount that counts toward `confirmed` in the classification algorithm.
    pub fn confirmed_amount(&self) -> Cent {
        match self {
            ActualPaymentStatus::Confirmed(p) | ActualPaymentStatus::WriteOff(p) => *p,
            _ => Cent::ZERO,
        }
    }

    /// The amount still awaiting confirmation.
    pub fn pending_amount(&self) -> Cent {
        match self {
            ActualPaymentStatus::Pending(p) => *p,
            _ => Cent::ZERO,
        }
    }

    pub fn failed_charges(&self) -> &[Charge] {
        match self {
            ActualPaymentStatus::Failed(_, charges) => charges,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualPayment {
    pub status: ActualPaymentStatus,
    #[serde(default)]
    pub metadata: Value,
}

impl ActualPayment {
    pub fn new(status: ActualPaymentStatus) -> ActualPayment {
        ActualPayment {
            status,
            metadata: Value::Null,
        }
    }

    /// Reclassify a `Pending` payment whose scheduled day `day` is older
    /// than `payment_timeout` relative to `as_of_day` as `TimedOut`.
    pub fn reclassify_timeout(&self, day: OffsetDay, as_of_day: OffsetDay, payment_timeout: DurationDay) -> ActualPayment {
        match &self.status {
            ActualPaymentStatus::Pending(amount) if as_of_day - day > payment_timeout => ActualPayment {
                status: ActualPaymentStatus::TimedOut(*amount),
                metadata: self.metadata.clone(),
            },
            _ => self.clone(),
        }
    }
}
