use serde::{Deserialize, Serialize};

use crate::applied_payment::applied_payment::PaymentStatus;
use crate::calendar::offset::OffsetDay;
use crate::money::cent::Cent;
use crate::money::decimal_cent::DecimalCent;

/// Where the outstanding balance stands after a day's apportionment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    Normal,
    Settled,
    WrittenOff,
    PaidAhead,
}

/// One day's output row of the amortisation fold: what was owed, what was
/// charged, how an incoming payment was apportioned, and the balance left
/// afterward. The engine emits one of these per `AppliedPayment`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub offset_day: OffsetDay,
    /// 1-based index of the scheduled-payment period this day falls in.
    pub window: usize,
    pub opening_balance: DecimalCent,
    /// This day's accrued interest, fractional — rounding only happens when
    /// cents are actually charged or paid against it.
    pub interest_charged: DecimalCent,
    pub charges_charged: Cent,
    pub payment_status: PaymentStatus,
    pub charges_paid: Cent,
    pub interest_paid: Cent,
    pub fees_paid: Cent,
    pub principal_paid: Cent,
    pub underpayment: Cent,
    pub closing_principal_balance: Cent,
    pub closing_fees_balance: Cent,
    pub closing_charges_balance: Cent,
    pub closing_interest_balance: DecimalCent,
    pub closing_balance: DecimalCent,
    pub balance_status: BalanceStatus,
    /// What the fee refund would be (per `SettlementRefund`) if the loan were
    /// settled in full on this day.
    pub fees_refund_if_settled: Cent,
    /// The net payment that would, if added on this day, close the balance
    /// exactly: outstanding charges, interest, fees (net of the settlement
    /// refund) and principal.
    pub settlement_figure: Cent,
}

impl ScheduleItem {
    pub fn total_paid(&self) -> Cent {
        self.charges_paid + self.interest_paid + self.fees_paid + self.principal_paid
    }
}
