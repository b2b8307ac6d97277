//! Request types for the work-time accounting API.
//!
//! Day records, overtime requests and vacation entries are accepted in their
//! stored camelCase document shape. The envelopes around them use snake_case.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::WifiSignal;
use crate::models::{
    DayRecord, EventSource, Memo, OvertimeRequest, OvertimeSubmission, RequestStatus,
    VacationEntry, VacationSubmission,
};

/// Request body for `POST /stats/monthly`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyStatsRequest {
    /// Year of the month.
    pub year: i32,
    /// Month number, 1 to 12.
    pub month: u32,
    /// The user's day records for the month.
    #[serde(default)]
    pub day_records: Vec<DayRecord>,
    /// The user's overtime requests.
    #[serde(default)]
    pub overtime_requests: Vec<OvertimeRequest>,
    /// Comp-leave balance at the start of the month.
    #[serde(default)]
    pub carried_comp_minutes: i64,
}

/// Request body for `POST /stats/annual`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualStatsRequest {
    /// The year to aggregate.
    pub year: i32,
    /// The user's day records for the year.
    #[serde(default)]
    pub day_records: Vec<DayRecord>,
    /// The user's overtime requests.
    #[serde(default)]
    pub overtime_requests: Vec<OvertimeRequest>,
}

/// Request body for `POST /geofence/classify`.
///
/// Either `coordinate_text` or both `latitude` and `longitude` must be given.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifyRequest {
    /// Stored coordinate text, e.g. `"위도: 37.53, 경도: 126.89"`.
    #[serde(default)]
    pub coordinate_text: Option<String>,
    /// Latitude in degrees.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in degrees.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Network detected by the device.
    #[serde(default)]
    pub wifi: Option<WifiSignal>,
}

/// Request body for `POST /requests/overtime/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OvertimeValidationRequest {
    /// The submission to check.
    pub submission: OvertimeSubmission,
    /// The user's stored requests, for the duplicate check.
    #[serde(default)]
    pub existing: Vec<OvertimeRequest>,
    /// Reference date; defaults to the server's local date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /requests/vacation/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationValidationRequest {
    /// The submission to check.
    pub submission: VacationSubmission,
    /// The user's stored vacation entries.
    #[serde(default)]
    pub existing: Vec<VacationEntry>,
    /// Remaining comp-leave balance, when known.
    #[serde(default)]
    pub available_comp_minutes: Option<i64>,
    /// Reference date; defaults to the server's local date.
    #[serde(default)]
    pub today: Option<NaiveDate>,
}

/// Request body for `POST /days/memo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoUpdateRequest {
    /// The record to edit.
    pub record: DayRecord,
    /// The list holding the event.
    pub source: EventSource,
    /// The stored time string of the event.
    pub time: String,
    /// The new memo.
    pub memo: Memo,
}

/// Request body for `POST /requests/overtime/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChangeRequest {
    /// The stored request.
    pub request: OvertimeRequest,
    /// The requested status.
    pub status: RequestStatus,
}
