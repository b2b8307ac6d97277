//! Per-user, per-date attendance record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::{Event, EventSource, Memo, VacationEntry};

/// All attendance data a user recorded on one calendar date.
///
/// Records are only ever appended to or have a memo edited in place; they are
/// never deleted. A day without a clock-out event stays open indefinitely.
///
/// # Example
///
/// ```
/// use worktime_engine::models::{DayRecord, Event, EventSource};
/// use chrono::NaiveDate;
///
/// let mut record = DayRecord::new("kim@example.com", NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
/// record.append_event(EventSource::Start, Event::new("09:00:00", "37.5,126.9", ""));
/// assert!(record.is_open());
///
/// record.append_event(EventSource::End, Event::new("18:00:00", "37.5,126.9", ""));
/// assert!(!record.is_open());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// Owner of the record (e-mail address in stored documents).
    pub user_id: String,
    /// The calendar date this record belongs to.
    pub date: NaiveDate,
    /// Clock-in events.
    #[serde(default)]
    pub start: Vec<Event>,
    /// Periodic location pings.
    #[serde(default, rename = "gps", alias = "mid")]
    pub mid: Vec<Event>,
    /// Clock-out events.
    #[serde(default)]
    pub end: Vec<Event>,
    /// Leave booked on this day.
    #[serde(default)]
    pub vacation: Vec<VacationEntry>,
}

impl DayRecord {
    /// Creates an empty record.
    pub fn new(user_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            date,
            start: Vec::new(),
            mid: Vec::new(),
            end: Vec::new(),
            vacation: Vec::new(),
        }
    }

    /// Returns the events of one list.
    pub fn events(&self, source: EventSource) -> &[Event] {
        match source {
            EventSource::Start => &self.start,
            EventSource::Mid => &self.mid,
            EventSource::End => &self.end,
        }
    }

    fn events_mut(&mut self, source: EventSource) -> &mut Vec<Event> {
        match source {
            EventSource::Start => &mut self.start,
            EventSource::Mid => &mut self.mid,
            EventSource::End => &mut self.end,
        }
    }

    /// Appends a new event to one list.
    pub fn append_event(&mut self, source: EventSource, event: Event) {
        debug!(user_id = %self.user_id, date = %self.date, %source, time = %event.time, "Appending event");
        self.events_mut(source).push(event);
    }

    /// Replaces the memo of the event recorded at `time` in the given list.
    ///
    /// Events are matched on their exact stored time string. When the same
    /// time was recorded twice, the most recently appended event is updated.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EventNotFound`] when no event in the list has
    /// that time.
    pub fn update_memo(&mut self, source: EventSource, time: &str, memo: Memo) -> EngineResult<()> {
        let event = self
            .events_mut(source)
            .iter_mut()
            .rev()
            .find(|e| e.time == time)
            .ok_or_else(|| EngineError::EventNotFound {
                list: source,
                time: time.to_string(),
            })?;
        event.memo = Some(memo);
        Ok(())
    }

    /// True when the user clocked in but has not clocked out yet.
    pub fn is_open(&self) -> bool {
        !self.start.is_empty() && self.end.is_empty()
    }

    /// Total number of stored events across the three lists.
    pub fn event_count(&self) -> usize {
        self.start.len() + self.mid.len() + self.end.len()
    }
}
