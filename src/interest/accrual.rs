use crate::money::cent::Cent;
use crate::money::decimal_cent::DecimalCent;
use crate::money::percent::Percent;

/// Sum one day's worth of interest per rate in `rates`, applying `daily_cap`
/// (if any) to each individual day before summing. Returns the fractional
/// total; rounding to a `Cent` is deferred to the caller (the engine, which
/// must fold the result into the running interest balance first).
pub fn accrue_interest(balance: Cent, daily_cap: Option<Cent>, rates: &[Percent]) -> DecimalCent {
    rates
        .iter()
        .map(|rate| {
            let days_interest = rate.of(balance);
            match daily_cap {
                Some(cap) if balance.is_positive() => days_interest.min(DecimalCent::from_cent(cap)),
                _ => days_interest,
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn daily_cap_limits_each_day_independently() {
        let rate = Percent::from_decimal(dec!(0.1));
        let rates = vec![rate, rate, rate];
        let accrued = accrue_interest(Cent::new(10_000), Some(Cent::new(500)), &rates);
        // Uncapped would be 1000/day; capped at 500/day for 3 days = 1500.
        assert_eq!(accrued.raw(), dec!(1500));
    }

    #[test]
    fn no_cap_sums_plain_daily_interest() {
        let rate = Percent::from_decimal(dec!(0.008));
        let rates = vec![rate; 30];
        let accrued = accrue_interest(Cent::new(40_000), None, &rates);
        assert_eq!(accrued.raw(), dec!(9600));
    }
}
