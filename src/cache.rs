//! Caller-owned caches for derived results.
//!
//! Both caches hold values that can be rebuilt from stored records at any
//! time. They are plain values owned by the caller: nothing is shared or
//! global, and a stale entry is fixed by invalidating and recomputing.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::calculation::{EventSeries, HolidayCalendar, MonthInput, build_event_series, monthly_stats};
use crate::config::WorkPolicy;
use crate::models::{DayRecord, MonthlyStat};

#[derive(Debug, Clone)]
struct SeriesEntry {
    record: DayRecord,
    series: EventSeries,
}

/// Event series per (user, date).
///
/// Each entry remembers the record it was built from. A lookup with a record
/// that has changed since (new event, edited memo) rebuilds the series.
///
/// # Example
///
/// ```
/// use worktime_engine::cache::EventSeriesCache;
/// use worktime_engine::models::{DayRecord, Event, EventSource};
/// use chrono::NaiveDate;
///
/// let mut cache = EventSeriesCache::new();
/// let mut record = DayRecord::new("kim@example.com", NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
/// record.append_event(EventSource::Start, Event::new("09:00:00", "37.5,126.9", ""));
///
/// assert_eq!(cache.get_or_build(&record).len(), 1);
///
/// record.append_event(EventSource::End, Event::new("18:00:00", "37.5,126.9", ""));
/// assert_eq!(cache.get_or_build(&record).len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventSeriesCache {
    entries: HashMap<(String, NaiveDate), SeriesEntry>,
}

impl EventSeriesCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the series for `record`, building it when missing or stale.
    pub fn get_or_build(&mut self, record: &DayRecord) -> &EventSeries {
        let key = (record.user_id.clone(), record.date);
        let entry = self.entries.entry(key).or_insert_with(|| SeriesEntry {
            record: record.clone(),
            series: build_event_series(record),
        });

        if entry.record != *record {
            debug!(user_id = %record.user_id, date = %record.date, "Rebuilding stale event series");
            entry.record = record.clone();
            entry.series = build_event_series(record);
        }

        &entry.series
    }

    /// Returns the cached series without rebuilding.
    pub fn get(&self, user_id: &str, date: NaiveDate) -> Option<&EventSeries> {
        self.entries
            .get(&(user_id.to_string(), date))
            .map(|entry| &entry.series)
    }

    /// Drops the series of one day.
    pub fn invalidate(&mut self, user_id: &str, date: NaiveDate) {
        self.entries.remove(&(user_id.to_string(), date));
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached series.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Monthly statistics per (user, year, month).
///
/// Entries are never refreshed implicitly. Invalidate a month whenever one of
/// its records, one of its overtime requests, or an earlier month's comp
/// balance changes; [`MonthlyStatsCache::invalidate_from`] covers the last
/// case.
#[derive(Debug, Clone, Default)]
pub struct MonthlyStatsCache {
    entries: HashMap<(String, i32, u32), MonthlyStat>,
}

impl MonthlyStatsCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached statistics of a month.
    pub fn get(&self, user_id: &str, year: i32, month: u32) -> Option<&MonthlyStat> {
        self.entries.get(&(user_id.to_string(), year, month))
    }

    /// Returns the cached statistics, computing and storing them when absent.
    pub fn get_or_compute<C: HolidayCalendar + ?Sized>(
        &mut self,
        user_id: &str,
        input: &MonthInput<'_>,
        calendar: &C,
        policy: &WorkPolicy,
    ) -> &MonthlyStat {
        self.entries
            .entry((user_id.to_string(), input.year, input.month))
            .or_insert_with(|| {
                debug!(user_id, year = input.year, month = input.month, "Computing monthly stats");
                monthly_stats(input, calendar, policy)
            })
    }

    /// Stores externally computed statistics, replacing any previous entry.
    pub fn insert(&mut self, user_id: &str, stat: MonthlyStat) {
        self.entries
            .insert((user_id.to_string(), stat.year, stat.month), stat);
    }

    /// Drops one month.
    pub fn invalidate(&mut self, user_id: &str, year: i32, month: u32) {
        self.entries.remove(&(user_id.to_string(), year, month));
    }

    /// Drops the month containing `date` and every later month of the user,
    /// whose carried comp balance depends on it.
    pub fn invalidate_from(&mut self, user_id: &str, date: NaiveDate) {
        let from = (date.year(), date.month());
        self.entries
            .retain(|(user, year, month), _| user != user_id || (*year, *month) < from);
    }

    /// Drops every entry of one user.
    pub fn invalidate_user(&mut self, user_id: &str) {
        self.entries.retain(|(user, _, _), _| user != user_id);
    }

    /// Number of cached months.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
