use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::offset::OffsetDay;
use crate::money::amount::Amount;
use crate::money::cent::Cent;
use crate::money::rounding::Rounding;

/// A single named fee, evaluated against the loan's principal at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeType {
    pub name: String,
    pub amount: Amount,
}

/// How an inbound payment splits between the outstanding fee balance and principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeeAmortisation {
    AmortiseProportionately,
    AmortiseBeforePrincipal,
}

/// What fee balance, if any, is refunded on early settlement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SettlementRefund {
    None,
    ProRata { original_final_day: Option<OffsetDay> },
    Balance,
}

impl SettlementRefund {
    /// The fee refund that would accompany settlement in full on `day`,
    /// given the lifetime span `[0, final_day]` and the unamortised
    /// `fees_balance` remaining. `fees_total` is the original lifetime fee
    /// amount (the numerator of the pro-rata fraction).
    pub fn refund_on(
        &self,
        fees_balance: Cent,
        fees_total: Cent,
        day: OffsetDay,
        final_day: Option<OffsetDay>,
        rounding: Rounding,
    ) -> Cent {
        match self {
            SettlementRefund::None => Cent::ZERO,
            SettlementRefund::Balance => fees_balance.at_least_zero(),
            SettlementRefund::ProRata { original_final_day } => {
                let final_day = original_final_day.or(final_day);
                match final_day {
                    Some(final_day) if final_day.value() > 0 && day.value() < final_day.value() => {
                        let remaining = Decimal::from(final_day.value() - day.value());
                        let span = Decimal::from(final_day.value());
                        let raw = Decimal::from(fees_total.value()) * remaining / span;
                        let rounded = Rounding::Up.round(raw);
                        let _ = rounding;
                        Cent::new(rounded.try_into().unwrap_or(0))
                            .at_least_zero()
                            .min(fees_balance.at_least_zero())
                    }
                    _ => Cent::ZERO,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    pub fee_types: Vec<FeeType>,
    pub rounding: Rounding,
    pub fee_amortisation: FeeAmortisation,
    pub settlement_refund: SettlementRefund,
}

impl FeeConfig {
    pub fn fees_total(&self, principal: Cent) -> Cent {
        self.fee_types
            .iter()
            .map(|fee_type| fee_type.amount.evaluate(principal))
            .fold(Cent::ZERO, |acc, x| acc + x)
    }

    /// `feesTotal / principal`, or zero when there is no principal to divide by.
    pub fn fees_percentage(&self, principal: Cent) -> Decimal {
        if principal.is_zero() {
            Decimal::ZERO
        } else {
            Decimal::from(self.fees_total(principal).value()) / Decimal::from(principal.value())
        }
    }

    /// Split `assignable` cents (what's left after charges and interest)
    /// into `(fees_portion, principal_portion)` per the configured policy.
    pub fn apportion(
        &self,
        assignable: Cent,
        fees_balance: Cent,
        fees_percentage: Decimal,
    ) -> (Cent, Cent) {
        let fees_portion = match self.fee_amortisation {
            FeeAmortisation::AmortiseBeforePrincipal => fees_balance.min(assignable).at_least_zero(),
            FeeAmortisation::AmortiseProportionately => {
                let p = fees_percentage;
                let raw = Decimal::from(assignable.value()) * p / (Decimal::ONE + p);
                let rounded = Rounding::Up.round(raw);
                Cent::new(rounded.try_into().unwrap_or(0))
                    .max(Cent::ZERO)
                    .min(fees_balance)
            }
        };
        let principal_portion = (assignable - fees_portion).at_least_zero();
        (fees_portion, principal_portion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::amount::Restriction;
    use crate::money::percent::Percent;
    use rust_decimal_macros::dec;

    fn config(policy: FeeAmortisation) -> FeeConfig {
        FeeConfig {
            fee_types: vec![FeeType {
                name: "origination".to_string(),
                amount: Amount::Percentage {
                    rate: Percent::from_decimal(dec!(0.1)),
                    restriction: Restriction::NoLimit,
                    rounding: Rounding::Up,
                },
            }],
            rounding: Rounding::Up,
            fee_amortisation: policy,
            settlement_refund: SettlementRefund::None,
        }
    }

    #[test]
    fn amortise_before_principal_takes_fees_first() {
        let fees = config(FeeAmortisation::AmortiseBeforePrincipal);
        let (fees_portion, principal_portion) =
            fees.apportion(Cent::new(3_000), Cent::new(4_000), dec!(0.1));
        assert_eq!(fees_portion, Cent::new(3_000));
        assert_eq!(principal_portion, Cent::ZERO);
    }

    #[test]
    fn amortise_proportionately_splits_by_fee_percentage() {
        let fees = config(FeeAmortisation::AmortiseProportionately);
        // p = 0.1 => fees_portion = assignable * 0.1 / 1.1
        let (fees_portion, principal_portion) =
            fees.apportion(Cent::new(11_000), Cent::new(999_999), dec!(0.1));
        assert_eq!(fees_portion, Cent::new(1_000));
        assert_eq!(principal_portion, Cent::new(10_000));
    }

    #[test]
    fn fees_total_sums_all_fee_types() {
        let fees = config(FeeAmortisation::AmortiseBeforePrincipal);
        assert_eq!(fees.fees_total(Cent::new(40_000)), Cent::new(4_000));
    }

    #[test]
    fn pro_rata_refund_shrinks_toward_maturity() {
        let refund = SettlementRefund::ProRata { original_final_day: None };
        let half_life = refund.refund_on(
            Cent::new(10_000),
            Cent::new(10_000),
            OffsetDay::new(60),
            Some(OffsetDay::new(120)),
            Rounding::Up,
        );
        assert_eq!(half_life, Cent::new(5_000));
        let at_maturity = refund.refund_on(
            Cent::new(10_000),
            Cent::new(10_000),
            OffsetDay::new(120),
            Some(OffsetDay::new(120)),
            Rounding::Up,
        );
        assert_eq!(at_maturity, Cent::ZERO);
    }

    #[test]
    fn no_refund_policy_never_refunds() {
        let refund = SettlementRefund::None;
        assert_eq!(
            refund.refund_on(Cent::new(10_000), Cent::new(10_000), OffsetDay::new(10), Some(OffsetDay::new(120)), Rounding::Up),
            Cent::ZERO
        );
    }
}
