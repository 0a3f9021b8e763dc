use std::fmt;
use std::ops::{Add, Sub};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A signed count of days, e.g. the distance between two `OffsetDay`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DurationDay(i64);

impl DurationDay {
    pub fn new(days: i64) -> DurationDay {
        DurationDay(days)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Days elapsed since a loan's `startDate`. Day 0 is the start date itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OffsetDay(i64);

impl OffsetDay {
    pub const ZERO: OffsetDay = OffsetDay(0);

    pub fn new(days: i64) -> OffsetDay {
        OffsetDay(days)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// The offset of `date` relative to `start_date`.
    pub fn of(start_date: NaiveDate, date: NaiveDate) -> OffsetDay {
        OffsetDay((date - start_date).num_days())
    }

    pub fn to_date(&self, start_date: NaiveDate) -> NaiveDate {
        start_date + chrono::Duration::days(self.0)
    }
}

impl fmt::Display for OffsetDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add<DurationDay> for OffsetDay {
    type Output = OffsetDay;
    fn add(self, rhs: DurationDay) -> OffsetDay {
        OffsetDay(self.0 + rhs.0)
    }
}

impl Sub for OffsetDay {
    type Output = DurationDay;
    fn sub(self, rhs: OffsetDay) -> DurationDay {
        DurationDay(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_of_round_trips_through_to_date() {
        let start = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
        let offset = OffsetDay::of(start, date);
        assert_eq!(offset, OffsetDay::new(30));
        assert_eq!(offset.to_date(start), date);
    }
}
