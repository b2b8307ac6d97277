//! Holiday table model.
//!
//! This module contains the [`Holiday`] and [`HolidayTable`] types that back
//! business-day counting.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single public holiday.
///
/// # Example
///
/// ```
/// use worktime_engine::models::Holiday;
/// use chrono::NaiveDate;
///
/// let holiday = Holiday {
///     date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     name: "삼일절".to_string(),
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// The date of the holiday.
    pub date: NaiveDate,
    /// The name of the holiday.
    pub name: String,
}

/// Read-only lookup of holidays by date.
///
/// A date listed twice keeps the last name seen.
///
/// # Example
///
/// ```
/// use worktime_engine::models::{Holiday, HolidayTable};
/// use chrono::NaiveDate;
///
/// let table = HolidayTable::new(vec![Holiday {
///     date: NaiveDate::from_ymd_opt(2026, 10, 9).unwrap(),
///     name: "한글날".to_string(),
/// }]);
///
/// assert_eq!(table.name_of(NaiveDate::from_ymd_opt(2026, 10, 9).unwrap()), Some("한글날"));
/// assert_eq!(table.name_of(NaiveDate::from_ymd_opt(2026, 10, 8).unwrap()), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Holiday>", into = "Vec<Holiday>")]
pub struct HolidayTable {
    holidays: BTreeMap<NaiveDate, String>,
}

impl HolidayTable {
    /// Builds a table from a list of holidays.
    pub fn new(holidays: Vec<Holiday>) -> Self {
        let mut table = Self::default();
        table.extend(holidays);
        table
    }

    /// Adds holidays to the table.
    pub fn extend(&mut self, holidays: impl IntoIterator<Item = Holiday>) {
        for holiday in holidays {
            self.holidays.insert(holiday.date, holiday.name);
        }
    }

    /// Returns the holiday name for a date.
    pub fn name_of(&self, date: NaiveDate) -> Option<&str> {
        self.holidays.get(&date).map(String::as_str)
    }

    /// Returns the holidays falling in a calendar month, in date order.
    pub fn in_month(&self, year: i32, month: u32) -> Vec<Holiday> {
        self.holidays
            .iter()
            .filter(|(date, _)| date.year() == year && date.month() == month)
            .map(|(date, name)| Holiday {
                date: *date,
                name: name.clone(),
            })
            .collect()
    }

    /// Number of holidays in the table.
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// True when the table holds no holidays.
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }
}

impl From<Vec<Holiday>> for HolidayTable {
    fn from(holidays: Vec<Holiday>) -> Self {
        Self::new(holidays)
    }
}

impl From<HolidayTable> for Vec<Holiday> {
    fn from(table: HolidayTable) -> Self {
        table
            .holidays
            .into_iter()
            .map(|(date, name)| Holiday { date, name })
            .collect()
    }
}
