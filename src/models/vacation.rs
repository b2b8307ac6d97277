//! Vacation entry model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The kind of leave an entry books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VacationType {
    /// 오전반휴: morning half-day.
    #[serde(rename = "오전반휴")]
    HalfDayAm,
    /// 오후반휴: afternoon half-day.
    #[serde(rename = "오후반휴")]
    HalfDayPm,
    /// 종일연차: full-day annual leave.
    #[serde(rename = "종일연차")]
    FullDay,
    /// 보상휴가: compensation leave drawn from overtime.
    #[serde(rename = "보상휴가")]
    CompLeave,
}

impl VacationType {
    /// Returns the stored label.
    pub fn label(&self) -> &'static str {
        match self {
            VacationType::HalfDayAm => "오전반휴",
            VacationType::HalfDayPm => "오후반휴",
            VacationType::FullDay => "종일연차",
            VacationType::CompLeave => "보상휴가",
        }
    }

    /// True for the types drawn from the annual leave allowance.
    pub fn is_annual_leave(&self) -> bool {
        !matches!(self, VacationType::CompLeave)
    }
}

impl fmt::Display for VacationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A booked leave interval on a single day.
///
/// # Example
///
/// ```
/// use worktime_engine::models::{VacationEntry, VacationType};
///
/// let json = r#"{"date":"2026-03-02","start":"09:00","end":"13:00","type":"오전반휴"}"#;
/// let entry: VacationEntry = serde_json::from_str(json).unwrap();
/// assert_eq!(entry.vacation_type, VacationType::HalfDayAm);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationEntry {
    /// The day the leave is taken.
    pub date: NaiveDate,
    /// Start time string.
    pub start: String,
    /// End time string.
    pub end: String,
    /// Leave type.
    #[serde(rename = "type")]
    pub vacation_type: VacationType,
}

/// A leave request as submitted by the user, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationSubmission {
    /// The submitting user.
    pub user_id: String,
    /// Requested date, `YYYY-MM-DD`.
    pub date: String,
    /// Start time string.
    pub start: String,
    /// End time string.
    pub end: String,
    /// Requested leave type.
    #[serde(rename = "type")]
    pub vacation_type: VacationType,
}
