//! Attendance event model.
//!
//! Events are stored exactly as the attendance client writes them: a locale
//! time string, a free-form coordinate string, a reverse-geocoded address and
//! an optional memo. Field names follow the stored document shape (camelCase).

use std::fmt;

use serde::{Deserialize, Serialize};

/// The list a raw event was recorded in.
///
/// Assigned once when the three per-day lists are merged and never changed
/// afterwards. Consumers use it for path colouring and per-event duration math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Clock-in ping.
    Start,
    /// Periodic location ping (stored under `gps`).
    Mid,
    /// Clock-out ping.
    End,
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventSource::Start => write!(f, "start"),
            EventSource::Mid => write!(f, "mid"),
            EventSource::End => write!(f, "end"),
        }
    }
}

/// Where the employee worked for a given event.
///
/// Serialized with the Korean labels used in stored documents.
///
/// # Example
///
/// ```
/// use worktime_engine::models::WorkType;
///
/// let json = serde_json::to_string(&WorkType::InOffice).unwrap();
/// assert_eq!(json, "\"내근\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    /// 내근: at the office.
    #[serde(rename = "내근")]
    InOffice,
    /// 외근: off-site (client visit, field work).
    #[serde(rename = "외근")]
    OffSite,
    /// 재택: remote from home.
    #[serde(rename = "재택")]
    Remote,
}

impl WorkType {
    /// Returns the stored label.
    pub fn label(&self) -> &'static str {
        match self {
            WorkType::InOffice => "내근",
            WorkType::OffSite => "외근",
            WorkType::Remote => "재택",
        }
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Free-form annotation attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    /// Project name the time was spent on.
    #[serde(default)]
    pub project: String,
    /// Work location type, if chosen or auto-classified.
    #[serde(default)]
    pub work_type: Option<WorkType>,
    /// Free text details.
    #[serde(default)]
    pub details: String,
}

/// A single raw attendance event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Locale time string, e.g. `"09:00:00"` or `"오후 6:05:12"`.
    pub time: String,
    /// Coordinate text, e.g. `"위도: 37.53, 경도: 126.89"` or `"37.53,126.89"`.
    #[serde(default)]
    pub coordinate_text: String,
    /// Reverse-geocoded address, display only.
    #[serde(default)]
    pub address: String,
    /// Optional memo.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<Memo>,
    /// Cached worked-duration display string, written on clock-out events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

impl Event {
    /// Creates an event without memo or cached duration.
    pub fn new(
        time: impl Into<String>,
        coordinate_text: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            time: time.into(),
            coordinate_text: coordinate_text.into(),
            address: address.into(),
            memo: None,
            duration: None,
        }
    }

    /// Returns the work type recorded in the memo, if any.
    pub fn work_type(&self) -> Option<WorkType> {
        self.memo.as_ref().and_then(|m| m.work_type)
    }
}
