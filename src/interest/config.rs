use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::date_range::DateRange;
use crate::calendar::offset::DurationDay;
use crate::money::amount::Amount;
use crate::money::cent::Cent;
use crate::money::percent::{Percent, Rate};

/// Per-day and lifetime ceilings on interest charged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cap {
    pub daily: Option<Cent>,
    /// Expressed against principal, e.g. `Amount::Percentage` for "100% of principal".
    pub total: Option<Amount>,
}

impl Cap {
    pub fn total_cap(&self, principal: Cent) -> Option<Cent> {
        self.total.map(|amount| amount.evaluate(principal))
    }
}

/// A temporary override of the standard rate over a closed date interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromotionalRate {
    pub range: DateRange,
    pub rate: Rate,
}

/// Whether interest is calculated as it accrues (`Simple`) or reserved up
/// front and reconciled against actual payment timing (`AddOn`). `AddOn` is
/// experimental — see DESIGN.md — and must be opted into explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterestMethod {
    Simple,
    AddOn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestConfig {
    pub method: InterestMethod,
    pub standard_rate: Rate,
    pub cap: Cap,
    pub initial_grace_period: DurationDay,
    pub promotional_rates: Vec<PromotionalRate>,
    /// Rate applied to a negative (in-credit) balance. Defaults to zero.
    pub rate_on_negative_balance: Option<Rate>,
}

impl InterestConfig {
    pub fn rate_on_negative_balance(&self) -> Rate {
        self.rate_on_negative_balance
            .unwrap_or(Rate::Daily(Percent::ZERO))
    }

    /// The daily rate that applies on `day`, by precedence: promotional
    /// interval, then the initial grace period (only while a grace-period
    /// settlement is in progress), then the standard rate.
    pub fn daily_rate_on(
        &self,
        day: NaiveDate,
        start_date: NaiveDate,
        in_grace_settlement: bool,
    ) -> Percent {
        if let Some(promo) = self
            .promotional_rates
            .iter()
            .find(|promo| promo.range.contains(day))
        {
            return promo.rate.to_daily();
        }
        let days_since_start = (day - start_date).num_days();
        if in_grace_settlement
            && days_since_start >= 0
            && days_since_start <= self.initial_grace_period.value()
        {
            return Percent::ZERO;
        }
        self.standard_rate.to_daily()
    }

    /// The daily rate for every day in `(from_day, to_day]`.
    pub fn daily_rates(
        &self,
        from_day: NaiveDate,
        to_day: NaiveDate,
        start_date: NaiveDate,
        in_grace_settlement: bool,
    ) -> Vec<Percent> {
        let span = (to_day - from_day).num_days();
        (1..=span.max(0))
            .map(|offset| {
                let day = from_day + chrono::Duration::days(offset);
                self.daily_rate_on(day, start_date, in_grace_settlement)
            })
            .collect()
    }
}
