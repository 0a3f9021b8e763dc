use chrono::NaiveDate;

use crate::money::cent::Cent;
use crate::money::decimal_cent::DecimalCent;

/// Running state folded across the amortisation schedule. Balances are
/// tracked separately because they amortise and accrue differently:
/// `principal_balance` and `fees_balance` both accrue interest (the loan's
/// financed amount); `interest_balance` is interest already charged but not
/// yet paid off, and never itself earns interest; `charges_balance` is
/// unpaid charges carried forward for a future day's apportionment.
///
/// `interest_balance` is fractional so that the residue left over when a
/// day's interest is rounded to cents for emission is never discarded — it
/// is carried forward and folded into a later day's rounding instead,
/// keeping the sum of emitted interest exactly equal to the sum accrued.
#[derive(Debug, Clone, Copy)]
pub struct Accumulator {
    pub principal_balance: Cent,
    pub fees_balance: Cent,
    pub charges_balance: Cent,
    pub interest_balance: DecimalCent,
    pub last_date: NaiveDate,
    pub cumulative_interest_charged: DecimalCent,
    pub in_grace_settlement: bool,
    /// 1-based index of the current scheduled-payment period, incremented
    /// whenever a day carries an Original or Rescheduled scheduled payment.
    pub window: usize,
}

impl Accumulator {
    pub fn new(principal: Cent, fees_total: Cent, start_date: NaiveDate, in_grace_settlement: bool) -> Accumulator {
        Accumulator {
            principal_balance: principal,
            fees_balance: fees_total,
            charges_balance: Cent::ZERO,
            interest_balance: DecimalCent::ZERO,
            last_date: start_date,
            cumulative_interest_charged: DecimalCent::ZERO,
            in_grace_settlement,
            window: 0,
        }
    }

    /// The amount interest accrues against: principal plus unamortised fees.
    pub fn accrual_base(&self) -> Cent {
        self.principal_balance + self.fees_balance
    }

    /// Everything still owed: financed balance plus unpaid interest and
    /// charges. Can go negative when the borrower has paid ahead, leaving a
    /// credit.
    pub fn total_owed(&self) -> DecimalCent {
        DecimalCent::from_cent(self.principal_balance + self.fees_balance + self.charges_balance) + self.interest_balance
    }
}
