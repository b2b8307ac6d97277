//! Per-day work and vacation accounting.
//!
//! Worked time is recomputed from the earliest clock-in and the latest
//! clock-out on every call. The `duration` string cached on clock-out events
//! is only read when no clock-in time is usable.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LunchWindow;
use crate::models::{DayRecord, EngineWarning, Event, EventSource, VacationEntry, VacationType, WorkType};

use super::duration_format::parse_duration_to_minutes;
use super::event_series::DayClock;
use super::interval::{
    format_clock, lunch_excluded_length, merge_intervals, parse_time_to_seconds, worked_seconds,
};

/// Worked minutes for one day, with the problems found on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWork {
    /// Worked minutes after lunch and vacation deductions.
    pub minutes: i64,
    /// Degraded paths taken.
    pub warnings: Vec<EngineWarning>,
}

/// Vacation minutes for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyVacation {
    /// Total vacation minutes, overlapping entries counted once.
    pub minutes: i64,
    /// Minutes per vacation type, each entry counted in full.
    pub by_type: BTreeMap<VacationType, i64>,
    /// Degraded paths taken.
    pub warnings: Vec<EngineWarning>,
}

impl DailyVacation {
    /// Minutes booked as annual leave (반휴 and 연차).
    pub fn annual_minutes(&self) -> i64 {
        self.by_type
            .iter()
            .filter(|(kind, _)| kind.is_annual_leave())
            .map(|(_, minutes)| minutes)
            .sum()
    }

    /// Minutes booked as compensation leave.
    pub fn comp_minutes(&self) -> i64 {
        self.by_type.get(&VacationType::CompLeave).copied().unwrap_or(0)
    }
}

/// Everything the engine derives from one day record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    /// Owner of the record.
    pub user_id: String,
    /// The record's date.
    pub date: NaiveDate,
    /// Recomputed worked minutes.
    pub worked_minutes: i64,
    /// Vacation minutes.
    pub vacation_minutes: i64,
    /// Vacation minutes per type.
    pub vacation_by_type: BTreeMap<VacationType, i64>,
    /// Earliest clock-in, as `HH:MM:SS`.
    pub first_clock_in: Option<String>,
    /// Latest clock-out, as `HH:MM:SS`.
    pub last_clock_out: Option<String>,
    /// True while the day has no clock-out.
    pub is_open: bool,
    /// The work type of the latest event carrying one.
    pub work_type: Option<WorkType>,
    /// The duration string cached on the latest clock-out, as stored.
    pub cached_duration: Option<String>,
    /// Degraded paths taken.
    pub warnings: Vec<EngineWarning>,
}

/// The latest clock-out of the record as `(offset seconds, event)`.
///
/// Clock-outs earlier than the first clock-in count as next-day times.
fn latest_clock_out<'a>(record: &'a DayRecord, clock: &DayClock) -> Option<(i64, &'a Event)> {
    record
        .end
        .iter()
        .filter_map(|event| {
            parse_time_to_seconds(&event.time)
                .map(|s| (clock.offset(EventSource::End, s), event))
        })
        .max_by_key(|(offset, _)| *offset)
}

/// Vacation entries dated on the record's day; others are reported.
fn same_day_vacations(record: &DayRecord, warnings: &mut Vec<EngineWarning>) -> Vec<VacationEntry> {
    let mut entries = Vec::with_capacity(record.vacation.len());
    for entry in &record.vacation {
        if entry.date == record.date {
            entries.push(entry.clone());
        } else {
            warn!(record_date = %record.date, vacation_date = %entry.date, "Ignoring vacation dated on another day");
            warnings.push(EngineWarning::data_integrity(
                "VACATION_DATE_MISMATCH",
                format!("vacation dated {} stored on {}", entry.date, record.date),
            ));
        }
    }
    entries
}

/// Computes worked minutes for a day and reports degraded paths.
///
/// - No clock-out: the day is open and counts 0 minutes.
/// - No usable clock-in: the cached duration of the latest clock-out is
///   used, or 0 when there is none.
/// - A cached duration that differs from the recomputed value is reported as
///   `STALE_CACHED_DURATION`; the recomputed value wins.
pub fn daily_work(record: &DayRecord, lunch: &LunchWindow) -> DailyWork {
    let mut warnings = Vec::new();

    if record.end.is_empty() {
        debug!(user_id = %record.user_id, date = %record.date, "Day still open");
        return DailyWork {
            minutes: 0,
            warnings,
        };
    }

    let clock = DayClock::of(record);
    let cached = record
        .end
        .last()
        .and_then(|e| e.duration.as_deref())
        .and_then(parse_duration_to_minutes);

    let Some((end_offset, end_event)) = latest_clock_out(record, &clock) else {
        warn!(user_id = %record.user_id, date = %record.date, "No clock-out time could be parsed");
        warnings.push(EngineWarning::parse_failure(
            "CLOCK_OUT_UNPARSEABLE",
            "no clock-out time could be parsed",
        ));
        return DailyWork {
            minutes: cached.unwrap_or(0).max(0),
            warnings,
        };
    };

    let Some(start) = clock.first_clock_in else {
        let fallback = end_event
            .duration
            .as_deref()
            .and_then(parse_duration_to_minutes)
            .unwrap_or(0)
            .max(0);
        warn!(
            user_id = %record.user_id,
            date = %record.date,
            fallback,
            "No usable clock-in, falling back to cached duration"
        );
        warnings.push(EngineWarning::parse_failure(
            "CLOCK_IN_UNPARSEABLE",
            format!("no clock-in time could be parsed, used cached duration of {fallback} minutes"),
        ));
        return DailyWork {
            minutes: fallback,
            warnings,
        };
    };

    let vacations = same_day_vacations(record, &mut warnings);
    let worked = worked_seconds(start, end_offset, &vacations, lunch);
    let minutes = worked.minutes();
    warnings.extend(worked.warnings);

    if let Some(cached) = end_event.duration.as_deref().and_then(parse_duration_to_minutes) {
        if cached != minutes {
            debug!(cached, minutes, "Cached duration differs from recomputed value");
            warnings.push(EngineWarning::data_integrity(
                "STALE_CACHED_DURATION",
                format!("cached duration {cached} minutes, recomputed {minutes} minutes"),
            ));
        }
    }

    DailyWork { minutes, warnings }
}

/// Worked minutes for a day.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::daily_worked_minutes;
/// use worktime_engine::config::LunchWindow;
/// use worktime_engine::models::{DayRecord, Event, EventSource};
/// use chrono::NaiveDate;
///
/// let mut record = DayRecord::new("kim@example.com", NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
/// record.append_event(EventSource::Start, Event::new("09:00:00", "37.5,126.9", ""));
/// record.append_event(EventSource::End, Event::new("18:00:00", "37.5,126.9", ""));
///
/// assert_eq!(daily_worked_minutes(&record, &LunchWindow::default()), 450);
/// ```
pub fn daily_worked_minutes(record: &DayRecord, lunch: &LunchWindow) -> i64 {
    daily_work(record, lunch).minutes
}

/// Computes vacation minutes for a day.
///
/// Each entry counts its length minus the lunch overlap. Entries with
/// unparseable or empty intervals are skipped with a warning. When entries
/// overlap, the total counts the shared time once and a `VACATION_OVERLAP`
/// warning is attached.
pub fn daily_vacation(record: &DayRecord, lunch: &LunchWindow) -> DailyVacation {
    let mut warnings = Vec::new();
    let mut by_type = BTreeMap::new();
    let mut intervals = Vec::new();

    for entry in same_day_vacations(record, &mut warnings) {
        let (Some(start), Some(end)) = (
            parse_time_to_seconds(&entry.start),
            parse_time_to_seconds(&entry.end),
        ) else {
            warn!(start = %entry.start, end = %entry.end, "Skipping unparseable vacation entry");
            warnings.push(EngineWarning::parse_failure(
                "VACATION_UNPARSEABLE",
                format!("vacation {} - {} could not be parsed", entry.start, entry.end),
            ));
            continue;
        };
        if end <= start {
            warn!(start = %entry.start, end = %entry.end, "Skipping empty vacation entry");
            warnings.push(EngineWarning::data_integrity(
                "VACATION_EMPTY_INTERVAL",
                format!("vacation {} - {} has no positive length", entry.start, entry.end),
            ));
            continue;
        }

        *by_type.entry(entry.vacation_type).or_insert(0) += lunch_excluded_length(start, end, lunch) / 60;
        intervals.push((start, end));
    }

    let (merged, overlapped) = merge_intervals(intervals);
    if overlapped {
        warn!(user_id = %record.user_id, date = %record.date, "Overlapping vacation entries");
        warnings.push(EngineWarning::data_integrity(
            "VACATION_OVERLAP",
            "vacation entries overlap each other; overlapping time counted once",
        ));
    }

    let minutes: i64 = merged
        .iter()
        .map(|&(s, e)| lunch_excluded_length(s, e, lunch) / 60)
        .sum();

    DailyVacation {
        minutes,
        by_type,
        warnings,
    }
}

/// Vacation minutes for a day.
pub fn daily_vacation_minutes(record: &DayRecord, lunch: &LunchWindow) -> i64 {
    daily_vacation(record, lunch).minutes
}

/// The work type of the latest event that carries one.
fn latest_work_type(record: &DayRecord, clock: &DayClock) -> Option<WorkType> {
    [EventSource::Start, EventSource::Mid, EventSource::End]
        .into_iter()
        .flat_map(|source| record.events(source).iter().map(move |event| (source, event)))
        .filter_map(|(source, event)| {
            let work_type = event.work_type()?;
            let seconds = parse_time_to_seconds(&event.time)?;
            Some((clock.offset(source, seconds), work_type))
        })
        .max_by_key(|(offset, _)| *offset)
        .map(|(_, work_type)| work_type)
}

/// Derives the full summary of a day record.
pub fn summarize_day(record: &DayRecord, lunch: &LunchWindow) -> DaySummary {
    let clock = DayClock::of(record);
    let last_clock_out = latest_clock_out(record, &clock);

    let work = daily_work(record, lunch);
    let vacation = daily_vacation(record, lunch);

    let mut warnings = work.warnings;
    for warning in vacation.warnings {
        if !warnings.contains(&warning) {
            warnings.push(warning);
        }
    }

    DaySummary {
        user_id: record.user_id.clone(),
        date: record.date,
        worked_minutes: work.minutes,
        vacation_minutes: vacation.minutes,
        vacation_by_type: vacation.by_type,
        first_clock_in: clock.first_clock_in.map(format_clock),
        last_clock_out: last_clock_out.map(|(offset, _)| format_clock(offset)),
        is_open: record.is_open(),
        work_type: latest_work_type(record, &clock),
        cached_duration: last_clock_out
            .and_then(|(_, event)| event.duration.clone())
            .or_else(|| record.end.last().and_then(|e| e.duration.clone())),
        warnings,
    }
}
