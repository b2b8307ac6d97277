//! Time-string parsing and interval arithmetic.
//!
//! All arithmetic is done in seconds since midnight of the record's day.
//! Parsing never panics or errors: an unparseable string yields `None` and
//! the caller decides how to degrade.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::LunchWindow;
use crate::models::{EngineWarning, VacationEntry};

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 24 * 3600;

const MERIDIEM_MARKERS: [(&str, bool); 6] = [
    ("오전", false),
    ("오후", true),
    ("AM", false),
    ("PM", true),
    ("am", false),
    ("pm", true),
];

/// Parses a locale time string into seconds since midnight.
///
/// Accepts `"HH:MM:SS"` and `"HH:MM"` in 24-hour form, or 12-hour form with
/// an `AM`/`PM` or `오전`/`오후` marker either before or after the clock part.
/// Returns `None` on anything else.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::parse_time_to_seconds;
///
/// assert_eq!(parse_time_to_seconds("09:30"), Some(34_200));
/// assert_eq!(parse_time_to_seconds("오후 6:05:10"), Some(65_110));
/// assert_eq!(parse_time_to_seconds("6:05:10 PM"), Some(65_110));
/// assert_eq!(parse_time_to_seconds("25:00"), None);
/// ```
pub fn parse_time_to_seconds(text: &str) -> Option<i64> {
    let mut clock = text.trim();
    let mut is_pm = None;

    for (marker, pm) in MERIDIEM_MARKERS {
        if let Some(rest) = clock.strip_prefix(marker) {
            clock = rest.trim();
            is_pm = Some(pm);
            break;
        }
        if let Some(rest) = clock.strip_suffix(marker) {
            clock = rest.trim();
            is_pm = Some(pm);
            break;
        }
    }

    let parts: Vec<&str> = clock.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }

    let mut fields = [0i64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    let [mut hours, minutes, seconds] = fields;

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    match is_pm {
        Some(pm) => {
            if hours == 0 || hours > 12 {
                return None;
            }
            hours %= 12;
            if pm {
                hours += 12;
            }
        }
        None if hours >= 24 => return None,
        None => {}
    }

    Some(hours * 3600 + minutes * 60 + seconds)
}

/// Formats seconds since midnight as a 24-hour `"HH:MM:SS"` string.
///
/// Values outside one day wrap around midnight.
pub fn format_clock(seconds: i64) -> String {
    let s = seconds.rem_euclid(SECONDS_PER_DAY);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// Length of the intersection of `[a_start, a_end)` and `[b_start, b_end)`.
///
/// Never negative.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::overlap;
///
/// assert_eq!(overlap(0, 10, 5, 20), 5);
/// assert_eq!(overlap(0, 10, 10, 20), 0);
/// ```
pub fn overlap(a_start: i64, a_end: i64, b_start: i64, b_end: i64) -> i64 {
    (a_end.min(b_end) - a_start.max(b_start)).max(0)
}

/// Length of `[start, end)` minus its overlap with the lunch window.
pub fn lunch_excluded_length(start: i64, end: i64, lunch: &LunchWindow) -> i64 {
    (end - start).max(0) - overlap(start, end, lunch.start_seconds(), lunch.end_seconds())
}

/// Sorts and merges overlapping intervals.
///
/// Returns the merged intervals and whether any two inputs overlapped.
/// Intervals that merely touch are not considered overlapping.
pub fn merge_intervals(mut intervals: Vec<(i64, i64)>) -> (Vec<(i64, i64)>, bool) {
    intervals.sort_unstable();
    let mut merged: Vec<(i64, i64)> = Vec::with_capacity(intervals.len());
    let mut overlapped = false;

    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start < last.1 => {
                overlapped = true;
                last.1 = last.1.max(end);
            }
            _ => merged.push((start, end)),
        }
    }

    (merged, overlapped)
}

/// Result of a worked-time computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedTime {
    /// Worked seconds after lunch and vacation deductions, clamped at zero.
    pub seconds: i64,
    /// Seconds deducted for lunch.
    pub lunch_seconds: i64,
    /// Seconds deducted for vacation.
    pub vacation_seconds: i64,
    /// Problems encountered while computing.
    pub warnings: Vec<EngineWarning>,
}

impl WorkedTime {
    /// Worked time in whole minutes (truncated).
    pub fn minutes(&self) -> i64 {
        self.seconds / 60
    }
}

/// Computes worked seconds between clock-in and clock-out.
///
/// `end - start` minus the lunch overlap minus the overlap with the vacation
/// intervals. Vacation intervals are validated first: unparseable, empty or
/// reversed intervals are discarded with a warning, and intervals entirely
/// outside `[start, end]` are ignored. Remaining intervals are clipped to the
/// shift and merged, so time covered by two entries is only deducted once;
/// such overlaps are reported as `VACATION_OVERLAP`. Vacation time inside the
/// lunch window is not deducted a second time.
///
/// A negative result is clamped to zero and reported as `NEGATIVE_DURATION`.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::worked_seconds;
/// use worktime_engine::config::LunchWindow;
///
/// // 09:00 - 18:00 with the 11:30 - 13:00 lunch break
/// let worked = worked_seconds(32_400, 64_800, &[], &LunchWindow::default());
/// assert_eq!(worked.seconds, 27_000);
/// ```
pub fn worked_seconds(
    start: i64,
    end: i64,
    vacations: &[VacationEntry],
    lunch: &LunchWindow,
) -> WorkedTime {
    let mut warnings = Vec::new();
    let lunch_seconds = overlap(start, end, lunch.start_seconds(), lunch.end_seconds());

    let mut clipped = Vec::with_capacity(vacations.len());
    for entry in vacations {
        let (Some(v_start), Some(v_end)) = (
            parse_time_to_seconds(&entry.start),
            parse_time_to_seconds(&entry.end),
        ) else {
            warn!(start = %entry.start, end = %entry.end, "Skipping unparseable vacation interval");
            warnings.push(EngineWarning::parse_failure(
                "VACATION_UNPARSEABLE",
                format!("vacation {} - {} could not be parsed", entry.start, entry.end),
            ));
            continue;
        };

        if v_end <= v_start {
            warn!(start = %entry.start, end = %entry.end, "Skipping empty vacation interval");
            warnings.push(EngineWarning::data_integrity(
                "VACATION_EMPTY_INTERVAL",
                format!("vacation {} - {} has no positive length", entry.start, entry.end),
            ));
            continue;
        }

        if overlap(start, end, v_start, v_end) == 0 {
            debug!(start = %entry.start, end = %entry.end, "Vacation interval outside shift");
            continue;
        }

        clipped.push((v_start.max(start), v_end.min(end)));
    }

    let (merged, overlapped) = merge_intervals(clipped);
    if overlapped {
        warn!("Overlapping vacation intervals merged before deduction");
        warnings.push(EngineWarning::data_integrity(
            "VACATION_OVERLAP",
            "vacation intervals overlap each other; overlapping time deducted once",
        ));
    }

    let vacation_seconds: i64 = merged
        .iter()
        .map(|&(s, e)| lunch_excluded_length(s, e, lunch))
        .sum();

    let raw = end - start - lunch_seconds - vacation_seconds;
    let seconds = if raw < 0 {
        warn!(start, end, raw, "Negative worked duration clamped to zero");
        warnings.push(EngineWarning::data_integrity(
            "NEGATIVE_DURATION",
            format!(
                "worked time {} - {} computed as {}s, clamped to 0",
                format_clock(start),
                format_clock(end),
                raw
            ),
        ));
        0
    } else {
        raw
    };

    WorkedTime {
        seconds,
        lunch_seconds,
        vacation_seconds,
        warnings,
    }
}
