use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::date_util::{add_months, add_years, days_in_month};
use crate::error::ConfigError;

/// A periodicity descriptor: how scheduled payment dates are spaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitPeriodConfig {
    Single(NaiveDate),
    Daily {
        start: NaiveDate,
    },
    Weekly {
        multiple: u32,
        start: NaiveDate,
    },
    SemiMonthly {
        year: i32,
        month: u32,
        day1: u32,
        day2: u32,
    },
    Monthly {
        multiple: u32,
        year: i32,
        month: u32,
        day: u32,
    },
}

impl UnitPeriodConfig {
    /// Reject configurations whose constraints make `generate_payment_schedule`
    /// ill-defined. Called once at construction, not on every generation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            UnitPeriodConfig::Single(_) | UnitPeriodConfig::Daily { .. } => Ok(()),
            UnitPeriodConfig::Weekly { multiple, .. } => {
                if *multiple == 0 {
                    Err(ConfigError::InvalidMultiple(*multiple))
                } else {
                    Ok(())
                }
            }
            UnitPeriodConfig::Monthly { multiple, .. } => {
                if *multiple == 0 {
                    Err(ConfigError::InvalidMultiple(*multiple))
                } else {
                    Ok(())
                }
            }
            UnitPeriodConfig::SemiMonthly { day1, day2, .. } => {
                let fifteen_day_spacing = (1..=15).contains(day1)
                    && (16..=31).contains(day2)
                    && day2 - day1 == 15;
                let month_end_pair = *day1 == 15 && *day2 == 31;
                if fifteen_day_spacing || month_end_pair {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidSemiMonthlyDays {
                        day1: *day1,
                        day2: *day2,
                    })
                }
            }
        }
    }

    /// The first scheduled payment date this config would produce.
    fn anchor(&self) -> NaiveDate {
        match self {
            UnitPeriodConfig::Single(date) => *date,
            UnitPeriodConfig::Daily { start } => *start,
            UnitPeriodConfig::Weekly { start, .. } => *start,
            UnitPeriodConfig::Monthly { year, month, day, .. } => {
                clamp_to_month(*year, *month, *day)
            }
            UnitPeriodConfig::SemiMonthly { year, month, day1, .. } => {
                clamp_to_month(*year, *month, *day1)
            }
        }
    }
}

fn clamp_to_month(year: i32, month: u32, day: u32) -> NaiveDate {
    let last_day = days_in_month(year, month);
    NaiveDate::from_ymd_opt(year, month, day.min(last_day)).unwrap()
}

/// Direction in which `generate_payment_schedule` walks from the anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

/// Produce `count` scheduled payment dates for `config`, always returned in
/// ascending order regardless of `direction` (`Reverse` walks backward from
/// the anchor, then the result is sorted ascending).
pub fn generate_payment_schedule(
    count: usize,
    direction: Direction,
    config: &UnitPeriodConfig,
) -> Result<Vec<NaiveDate>, ConfigError> {
    config.validate()?;
    if count == 0 {
        return Err(ConfigError::InvalidPaymentCount);
    }

    let mut dates = match config {
        UnitPeriodConfig::Single(date) => vec![*date],
        UnitPeriodConfig::Daily { start } => {
            (0..count as i64)
                .map(|i| step(*start, direction, i))
                .collect()
        }
        UnitPeriodConfig::Weekly { multiple, start } => (0..count as i64)
            .map(|i| step_days(*start, direction, i * (*multiple as i64) * 7))
            .collect(),
        UnitPeriodConfig::Monthly {
            multiple,
            year,
            month,
            day,
        } => {
            let anchor = clamp_to_month(*year, *month, *day);
            (0..count as i32)
                .map(|i| step_months(anchor, direction, i * (*multiple as i32)))
                .collect()
        }
        UnitPeriodConfig::SemiMonthly {
            year,
            month,
            day1,
            day2,
        } => generate_semi_monthly(count, direction, *year, *month, *day1, *day2),
    };

    dates.sort();
    Ok(dates)
}

fn step(start: NaiveDate, direction: Direction, i: i64) -> NaiveDate {
    step_days(start, direction, i)
}

fn step_days(anchor: NaiveDate, direction: Direction, days: i64) -> NaiveDate {
    match direction {
        Direction::Forward => anchor + chrono::Duration::days(days),
        Direction::Reverse => anchor - chrono::Duration::days(days),
    }
}

fn step_months(anchor: NaiveDate, direction: Direction, months: i32) -> NaiveDate {
    match direction {
        Direction::Forward => add_months(anchor, months),
        Direction::Reverse => add_months(anchor, -months),
    }
}

fn generate_semi_monthly(
    count: usize,
    direction: Direction,
    year: i32,
    month: u32,
    day1: u32,
    day2: u32,
) -> Vec<NaiveDate> {
    // Every calendar month contributes exactly two dates: day1 and day2
    // (day2 clamped to the month's last day, covering the day1=15/day2=31 case).
    let mut all_dates = Vec::with_capacity(count + 2);
    let half_months_needed = count as i32 / 2 + 2;
    let start_month_date = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    for i in 0..half_months_needed {
        let month_date = match direction {
            Direction::Forward => add_months(start_month_date, i),
            Direction::Reverse => add_months(start_month_date, -i),
        };
        let y = month_date.year();
        let m = month_date.month();
        all_dates.push(clamp_to_month(y, m, day1));
        all_dates.push(clamp_to_month(y, m, day2));
    }
    all_dates.sort();
    all_dates.dedup();

    let anchor = clamp_to_month(year, month, day1);
    match direction {
        Direction::Forward => all_dates
            .into_iter()
            .filter(|d| *d >= anchor)
            .take(count)
            .collect(),
        Direction::Reverse => {
            let mut candidates: Vec<NaiveDate> = all_dates.into_iter().filter(|d| *d <= anchor).collect();
            candidates.sort_by(|a, b| b.cmp(a));
            candidates.truncate(count);
            candidates
        }
    }
}
