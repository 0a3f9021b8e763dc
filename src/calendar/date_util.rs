use chrono::{Datelike, Duration, NaiveDate};

/// Number of days in `month` of `year`, Gregorian leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 1, 1).unwrap().leap_year() {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Shift `date` by `months`, clamping the day-of-month to the target
/// month's last day (so a 31st shifted into February lands on the 28th/29th).
pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let total = date.month0() as i32 + months;
    let new_year = date.year() + total.div_euclid(12);
    let new_month = total.rem_euclid(12) as u32 + 1;
    let last_day = days_in_month(new_year, new_month);
    NaiveDate::from_ymd_opt(new_year, new_month, last_day.min(date.day())).unwrap()
}

/// Shift `date` by `years`, clamping for Feb 29 landing on a non-leap year.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    let new_year = date.year() + years;
    let last_day = days_in_month(new_year, date.month());
    NaiveDate::from_ymd_opt(new_year, date.month(), last_day.min(date.day())).unwrap()
}

pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}
