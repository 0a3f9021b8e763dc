use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::calendar::date_range::DateRange;
use crate::calendar::offset::DurationDay;
use crate::money::amount::Amount;
use crate::money::cent::Cent;
use chrono::NaiveDate;

/// A charge levied against the borrower. `Custom` covers lender-defined
/// charge types the spec leaves open for extension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Charge {
    LatePayment(Amount),
    InsufficientFunds(Amount),
    Custom { name: String, amount: Amount },
}

impl Charge {
    pub fn amount(&self) -> &Amount {
        match self {
            Charge::LatePayment(amount) => amount,
            Charge::InsufficientFunds(amount) => amount,
            Charge::Custom { amount, .. } => amount,
        }
    }

    /// Discriminant used to group same-typed charges together.
    fn kind_key(&self) -> String {
        match self {
            Charge::LatePayment(_) => "late_payment".to_string(),
            Charge::InsufficientFunds(_) => "insufficient_funds".to_string(),
            Charge::Custom { name, .. } => format!("custom:{name}"),
        }
    }
}

/// How multiple charges incurred on the same day combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeGrouping {
    OneChargeTypePerDay,
    OneChargeTypePerProduct,
    AllChargesApplied,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeConfig {
    pub charge_types: Vec<Charge>,
    pub charge_holidays: Vec<DateRange>,
    pub charge_grouping: ChargeGrouping,
    pub late_payment_grace_period: DurationDay,
}

impl ChargeConfig {
    pub fn is_holiday(&self, day: NaiveDate) -> bool {
        self.charge_holidays.iter().any(|range| range.contains(day))
    }

    /// The configured late-payment charge type, if any, evaluated against
    /// `underpayment`.
    pub fn late_payment_charge(&self, underpayment: Cent) -> Option<(Charge, Cent)> {
        self.charge_types.iter().find_map(|charge| match charge {
            Charge::LatePayment(amount) => Some((charge.clone(), amount.evaluate(underpayment))),
            _ => None,
        })
    }

    /// Apply the configured grouping policy to a day's incurred charges,
    /// keeping at most the charges the policy allows.
    pub fn combine(&self, charges: Vec<(Charge, Cent)>) -> Vec<(Charge, Cent)> {
        match self.charge_grouping {
            ChargeGrouping::AllChargesApplied => charges,
            ChargeGrouping::OneChargeTypePerDay => charges.into_iter().take(1).collect(),
            ChargeGrouping::OneChargeTypePerProduct => {
                let mut seen = HashSet::new();
                charges
                    .into_iter()
                    .filter(|(charge, _)| seen.insert(charge.kind_key()))
                    .collect()
            }
        }
    }
}
