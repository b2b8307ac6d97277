//! Business-day calendar.
//!
//! A business day is a Monday to Friday that is not a public holiday. The
//! holiday source is injected through the [`HolidayCalendar`] trait; the
//! engine ships an implementation for the configured [`HolidayTable`].

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::warn;

use crate::models::{Holiday, HolidayTable};

/// Standard working hours per business day when no policy is configured.
pub const DEFAULT_DAILY_HOURS: u32 = 7;

/// A source of public holidays.
pub trait HolidayCalendar {
    /// The holiday name for `date`, if it is a holiday.
    fn holiday_name(&self, date: NaiveDate) -> Option<&str>;

    /// True when `date` is a public holiday.
    fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }

    /// True when `date` is a weekday and not a holiday.
    fn is_business_day(&self, date: NaiveDate) -> bool {
        is_weekday(date) && !self.is_holiday(date)
    }

    /// Holidays falling in a month, in date order. Empty for an invalid month.
    fn holidays_in_month(&self, year: i32, month: u32) -> Vec<Holiday> {
        month_days(year, month)
            .into_iter()
            .flatten()
            .filter_map(|date| {
                self.holiday_name(date).map(|name| Holiday {
                    date,
                    name: name.to_string(),
                })
            })
            .collect()
    }
}

impl HolidayCalendar for HolidayTable {
    fn holiday_name(&self, date: NaiveDate) -> Option<&str> {
        self.name_of(date)
    }
}

/// True for Monday to Friday.
pub fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every date of a month, or `None` for an invalid year/month.
pub fn month_days(year: i32, month: u32) -> Option<impl Iterator<Item = NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    Some(first.iter_days().take_while(move |d| d.month() == month))
}

/// Counts Monday to Friday dates in a month, ignoring holidays.
///
/// An invalid month yields 0.
pub fn weekday_count(year: i32, month: u32) -> u32 {
    let Some(days) = month_days(year, month) else {
        warn!(year, month, "Invalid month, no weekdays counted");
        return 0;
    };
    days.filter(|d| is_weekday(*d)).count() as u32
}

/// Counts business days in a month.
///
/// An invalid month yields 0.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::business_day_count;
/// use worktime_engine::models::{Holiday, HolidayTable};
/// use chrono::NaiveDate;
///
/// let holidays = HolidayTable::new(vec![Holiday {
///     date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
///     name: "대체공휴일".to_string(),
/// }]);
///
/// assert_eq!(business_day_count(&holidays, 2026, 3), 21);
/// ```
pub fn business_day_count<C: HolidayCalendar + ?Sized>(calendar: &C, year: i32, month: u32) -> u32 {
    let Some(days) = month_days(year, month) else {
        warn!(year, month, "Invalid month, no business days counted");
        return 0;
    };
    days.filter(|d| calendar.is_business_day(*d)).count() as u32
}

/// Standard minutes for a month: business days times the daily hours.
pub fn standard_minutes<C: HolidayCalendar + ?Sized>(
    calendar: &C,
    year: i32,
    month: u32,
    daily_hours: u32,
) -> i64 {
    i64::from(business_day_count(calendar, year, month)) * i64::from(daily_hours) * 60
}

/// Standard minutes for a whole year.
pub fn annual_standard_minutes<C: HolidayCalendar + ?Sized>(
    calendar: &C,
    year: i32,
    daily_hours: u32,
) -> i64 {
    (1..=12)
        .map(|month| standard_minutes(calendar, year, month, daily_hours))
        .sum()
}
