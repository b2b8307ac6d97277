//! Event series reconstruction.
//!
//! Merges the three event lists of a day record into one chronological,
//! numbered series of located events. This is the input of the path view and
//! of every per-event calculation.

use std::sync::LazyLock;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{DayRecord, EngineWarning, Event, EventSource};

use super::geofence::distance_meters;
use super::interval::{SECONDS_PER_DAY, parse_time_to_seconds};

static LABELED_COORDINATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"위도:\s*(-?\d+(?:\.\d+)?)\s*,\s*경도:\s*(-?\d+(?:\.\d+)?)")
        .expect("labeled coordinate pattern")
});

static PLAIN_COORDINATES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$")
        .expect("plain coordinate pattern")
});

/// Parses coordinate text into `(latitude, longitude)`.
///
/// Tries the labeled form `"위도: <lat>, 경도: <lng>"` first, then the plain
/// form `"<lat>,<lng>"`. The values are not range-checked here; see
/// [`is_valid_coordinate`].
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::parse_coordinates;
///
/// assert_eq!(
///     parse_coordinates("위도: 37.5362819, 경도: 126.8949029"),
///     Some((37.5362819, 126.8949029))
/// );
/// assert_eq!(parse_coordinates("37.5,126.9"), Some((37.5, 126.9)));
/// assert_eq!(parse_coordinates("서울시 영등포구"), None);
/// ```
pub fn parse_coordinates(text: &str) -> Option<(f64, f64)> {
    let captures = LABELED_COORDINATES
        .captures(text)
        .or_else(|| PLAIN_COORDINATES.captures(text))?;
    let latitude = captures.get(1)?.as_str().parse().ok()?;
    let longitude = captures.get(2)?.as_str().parse().ok()?;
    Some((latitude, longitude))
}

/// True when the coordinate is finite and within latitude/longitude range.
pub fn is_valid_coordinate(latitude: f64, longitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
}

/// An event placed in the day's chronological series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedEvent {
    /// The list the event was recorded in.
    pub source: EventSource,
    /// The stored event.
    pub event: Event,
    /// Parsed latitude.
    pub latitude: f64,
    /// Parsed longitude.
    pub longitude: f64,
    /// Whether the coordinate passed range validation.
    pub is_valid_coordinate: bool,
    /// Local wall-clock time of the event.
    pub timestamp: NaiveDateTime,
    /// 1-based position in the series.
    pub sequence_number: u32,
}

impl ProcessedEvent {
    /// Timestamp as milliseconds since the Unix epoch, treating the
    /// wall-clock time as UTC.
    pub fn timestamp_millis(&self) -> i64 {
        self.timestamp.and_utc().timestamp_millis()
    }
}

/// The chronological series built from one day record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSeries {
    /// The record's date.
    pub date: NaiveDate,
    /// Located events in chronological order.
    pub events: Vec<ProcessedEvent>,
    /// Number of stored events left out of the series.
    pub dropped: usize,
    /// Why events were left out.
    pub warnings: Vec<EngineWarning>,
}

impl EventSeries {
    /// Number of events in the series.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when no event could be placed.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Earliest parseable clock-in of the record, in seconds since midnight.
pub fn first_clock_in_seconds(record: &DayRecord) -> Option<i64> {
    record
        .start
        .iter()
        .filter_map(|e| parse_time_to_seconds(&e.time))
        .min()
}

/// Placement of a record's event times relative to its midnight.
///
/// A day is overnight when some clock-out is earlier than the first
/// clock-in. On such a day every mid or end time earlier than the first
/// clock-in belongs to the next calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayClock {
    /// Earliest parseable clock-in, in seconds since midnight.
    pub first_clock_in: Option<i64>,
    /// True when a clock-out falls after midnight.
    pub overnight: bool,
}

impl DayClock {
    /// Derives the clock of a record from its clock-in and clock-out times.
    pub fn of(record: &DayRecord) -> Self {
        let first_clock_in = first_clock_in_seconds(record);
        let overnight = first_clock_in.is_some_and(|first| {
            record
                .end
                .iter()
                .filter_map(|e| parse_time_to_seconds(&e.time))
                .any(|seconds| seconds < first)
        });
        Self {
            first_clock_in,
            overnight,
        }
    }

    /// Offset of an event from the record's midnight, in seconds.
    pub fn offset(&self, source: EventSource, seconds: i64) -> i64 {
        match (source, self.first_clock_in) {
            (EventSource::Mid | EventSource::End, Some(first)) if self.overnight && seconds < first => {
                seconds + SECONDS_PER_DAY
            }
            _ => seconds,
        }
    }
}

/// Builds the chronological series for a day record.
///
/// Events with unparseable times or invalid coordinates are dropped from
/// the series (not from storage) and reported as warnings. The remaining
/// events are stable-sorted by timestamp, so events with equal times keep
/// the start, mid, end list order, and numbered from 1.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::build_event_series;
/// use worktime_engine::models::{DayRecord, Event, EventSource};
/// use chrono::NaiveDate;
///
/// let mut record = DayRecord::new("kim@example.com", NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
/// record.append_event(EventSource::End, Event::new("18:00:00", "37.5,126.9", ""));
/// record.append_event(EventSource::Start, Event::new("09:00:00", "37.5,126.9", ""));
///
/// let series = build_event_series(&record);
/// assert_eq!(series.events[0].source, EventSource::Start);
/// assert_eq!(series.events[1].sequence_number, 2);
/// ```
pub fn build_event_series(record: &DayRecord) -> EventSeries {
    let clock = DayClock::of(record);
    let midnight = record.date.and_time(NaiveTime::MIN);
    let mut warnings = Vec::new();
    let mut dropped = 0;
    let mut events = Vec::with_capacity(record.event_count());

    for source in [EventSource::Start, EventSource::Mid, EventSource::End] {
        for event in record.events(source) {
            let Some(seconds) = parse_time_to_seconds(&event.time) else {
                warn!(%source, time = %event.time, "Dropping event with unparseable time");
                warnings.push(EngineWarning::parse_failure(
                    "EVENT_TIME_UNPARSEABLE",
                    format!("{source} event time '{}' could not be parsed", event.time),
                ));
                dropped += 1;
                continue;
            };

            let coordinate = parse_coordinates(&event.coordinate_text)
                .filter(|&(lat, lng)| is_valid_coordinate(lat, lng));
            let Some((latitude, longitude)) = coordinate else {
                warn!(%source, time = %event.time, coordinate = %event.coordinate_text, "Dropping event with invalid coordinate");
                warnings.push(EngineWarning::parse_failure(
                    "EVENT_COORDINATE_INVALID",
                    format!(
                        "{source} event at {} has invalid coordinate '{}'",
                        event.time, event.coordinate_text
                    ),
                ));
                dropped += 1;
                continue;
            };

            let offset = clock.offset(source, seconds);
            events.push(ProcessedEvent {
                source,
                event: event.clone(),
                latitude,
                longitude,
                is_valid_coordinate: true,
                timestamp: midnight + Duration::seconds(offset),
                sequence_number: 0,
            });
        }
    }

    events.sort_by_key(|e| e.timestamp);
    for (sequence, event) in (1..).zip(events.iter_mut()) {
        event.sequence_number = sequence;
    }

    debug!(
        user_id = %record.user_id,
        date = %record.date,
        events = events.len(),
        dropped,
        "Built event series"
    );

    EventSeries {
        date: record.date,
        events,
        dropped,
        warnings,
    }
}

/// The leg between two consecutive events of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSegment {
    /// Sequence number of the leg's first event.
    pub from_sequence: u32,
    /// Sequence number of the leg's second event.
    pub to_sequence: u32,
    /// Great-circle length of the leg.
    pub distance_meters: f64,
    /// Time between the two events.
    pub elapsed_seconds: i64,
}

/// Splits a series into consecutive legs.
pub fn path_segments(series: &EventSeries) -> Vec<PathSegment> {
    series
        .events
        .windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            PathSegment {
                from_sequence: from.sequence_number,
                to_sequence: to.sequence_number,
                distance_meters: distance_meters(
                    from.latitude,
                    from.longitude,
                    to.latitude,
                    to.longitude,
                ),
                elapsed_seconds: (to.timestamp - from.timestamp).num_seconds(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WarningKind;
    use proptest::prelude::*;

    fn record() -> DayRecord {
        DayRecord::new(
            "kim@example.com",
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap(),
        )
    }

    const OFFICE: &str = "위도: 37.5362819, 경도: 126.8949029";

    #[test]
    fn test_parse_coordinate_forms() {
        assert_eq!(parse_coordinates(OFFICE), Some((37.5362819, 126.8949029)));
        assert_eq!(parse_coordinates("위도:37.5,경도:127"), Some((37.5, 127.0)));
        assert_eq!(parse_coordinates(" -33.86 , 151.2 "), Some((-33.86, 151.2)));
        assert_eq!(parse_coordinates("37.5"), None);
        assert_eq!(parse_coordinates(""), None);
    }

    #[test]
    fn test_labeled_form_wins_over_plain() {
        // The labeled form is found inside surrounding text
        assert_eq!(
            parse_coordinates("현재 위치 (위도: 1.5, 경도: 2.5)"),
            Some((1.5, 2.5))
        );
    }

    #[test]
    fn test_coordinate_range() {
        assert!(is_valid_coordinate(90.0, -180.0));
        assert!(!is_valid_coordinate(90.1, 0.0));
        assert!(!is_valid_coordinate(0.0, 180.5));
        assert!(!is_valid_coordinate(f64::NAN, 0.0));
    }

    #[test]
    fn test_merges_lists_chronologically() {
        let mut record = record();
        record.append_event(EventSource::Start, Event::new("09:00:00", OFFICE, ""));
        record.append_event(EventSource::Mid, Event::new("12:00:00", "37.52,126.9", ""));
        record.append_event(EventSource::Mid, Event::new("10:00:00", "37.53,126.9", ""));
        record.append_event(EventSource::End, Event::new("오후 6:00:00", OFFICE, ""));

        let series = build_event_series(&record);
        let times: Vec<&str> = series.events.iter().map(|e| e.event.time.as_str()).collect();
        assert_eq!(times, vec!["09:00:00", "10:00:00", "12:00:00", "오후 6:00:00"]);
        let numbers: Vec<u32> = series.events.iter().map(|e| e.sequence_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(series.dropped, 0);
    }

    #[test]
    fn test_timestamp_uses_record_date() {
        let mut record = record();
        record.append_event(EventSource::Start, Event::new("09:00:00", OFFICE, ""));
        let series = build_event_series(&record);
        assert_eq!(
            series.events[0].timestamp,
            NaiveDate::from_ymd_opt(2026, 3, 3)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
        assert_eq!(series.events[0].timestamp_millis(), 1_772_528_400_000);
    }

    #[test]
    fn test_overnight_clock_out_rolls_to_next_day() {
        let mut record = record();
        record.append_event(EventSource::Start, Event::new("22:00:00", OFFICE, ""));
        record.append_event(EventSource::End, Event::new("02:00:00", OFFICE, ""));

        let series = build_event_series(&record);
        assert_eq!(series.events[1].source, EventSource::End);
        assert_eq!(
            series.events[1].timestamp.date(),
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_overnight_pings_follow_clock_in() {
        let mut record = record();
        record.append_event(EventSource::Start, Event::new("22:00:00", OFFICE, ""));
        record.append_event(EventSource::Mid, Event::new("23:00:00", OFFICE, ""));
        record.append_event(EventSource::Mid, Event::new("01:00:00", OFFICE, ""));
        record.append_event(EventSource::End, Event::new("02:00:00", OFFICE, ""));

        let series = build_event_series(&record);
        let placed: Vec<(EventSource, String)> = series
            .events
            .iter()
            .map(|e| (e.source, e.timestamp.to_string()))
            .collect();
        assert_eq!(
            placed,
            vec![
                (EventSource::Start, "2026-03-03 22:00:00".to_string()),
                (EventSource::Mid, "2026-03-03 23:00:00".to_string()),
                (EventSource::Mid, "2026-03-04 01:00:00".to_string()),
                (EventSource::End, "2026-03-04 02:00:00".to_string()),
            ]
        );
        assert_eq!(series.events[0].sequence_number, 1);
    }

    #[test]
    fn test_early_ping_stays_on_daytime_record() {
        let mut record = record();
        record.append_event(EventSource::Mid, Event::new("08:30:00", OFFICE, ""));
        record.append_event(EventSource::Start, Event::new("09:00:00", OFFICE, ""));
        record.append_event(EventSource::End, Event::new("18:00:00", OFFICE, ""));

        let clock = DayClock::of(&record);
        assert!(!clock.overnight);
        assert_eq!(clock.offset(EventSource::Mid, 8 * 3600 + 1800), 8 * 3600 + 1800);

        let series = build_event_series(&record);
        assert_eq!(series.events[0].source, EventSource::Mid);
        assert_eq!(series.events[0].timestamp.date(), record.date);
    }

    #[test]
    fn test_invalid_events_dropped_with_warnings() {
        let mut record = record();
        record.append_event(EventSource::Start, Event::new("09:00:00", OFFICE, ""));
        record.append_event(EventSource::Mid, Event::new("10:00:00", "위치 없음", ""));
        record.append_event(EventSource::Mid, Event::new("11:00:00", "95.0,126.9", ""));
        record.append_event(EventSource::Mid, Event::new("later", OFFICE, ""));

        let series = build_event_series(&record);
        assert_eq!(series.len(), 1);
        assert_eq!(series.dropped, 3);
        assert_eq!(series.warnings.len(), 3);
        assert!(series.warnings.iter().all(|w| w.kind == WarningKind::ParseFailure));
        assert_eq!(record.event_count(), 4);
    }

    #[test]
    fn test_equal_times_keep_list_order() {
        let mut record = record();
        record.append_event(EventSource::End, Event::new("09:00:00", OFFICE, ""));
        record.append_event(EventSource::Start, Event::new("09:00:00", OFFICE, ""));

        let series = build_event_series(&record);
        assert_eq!(series.events[0].source, EventSource::Start);
        assert_eq!(series.events[1].source, EventSource::End);
    }

    #[test]
    fn test_empty_record_gives_empty_series() {
        let series = build_event_series(&record());
        assert!(series.is_empty());
        assert!(path_segments(&series).is_empty());
    }

    #[test]
    fn test_path_segments_between_consecutive_events() {
        let mut record = record();
        record.append_event(EventSource::Start, Event::new("09:00:00", "37.0,127.0", ""));
        record.append_event(EventSource::Mid, Event::new("09:30:00", "37.0,127.0", ""));
        record.append_event(EventSource::End, Event::new("10:00:00", "38.0,127.0", ""));

        let segments = path_segments(&build_event_series(&record));
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].from_sequence, 1);
        assert_eq!(segments[0].to_sequence, 2);
        assert!(segments[0].distance_meters < 1e-6);
        assert_eq!(segments[0].elapsed_seconds, 1800);
        assert!((segments[1].distance_meters - 111_195.0).abs() < 10.0);
    }

    proptest! {
        #[test]
        fn prop_series_sorted_and_numbered(
            times in proptest::collection::vec((0u32..24, 0u32..60, 0usize..3), 0..20)
        ) {
            let mut record = record();
            for (hour, minute, list) in &times {
                let source = [EventSource::Start, EventSource::Mid, EventSource::Mid][*list];
                record.append_event(
                    source,
                    Event::new(format!("{hour:02}:{minute:02}:00"), OFFICE, ""),
                );
            }

            let series = build_event_series(&record);
            prop_assert_eq!(series.len(), times.len());
            for (index, pair) in series.events.windows(2).enumerate() {
                prop_assert!(pair[0].timestamp <= pair[1].timestamp);
                prop_assert_eq!(pair[0].sequence_number as usize, index + 1);
            }

            prop_assert_eq!(build_event_series(&record), series);
        }
    }
}
