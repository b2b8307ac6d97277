//! Configuration types for work-time accounting.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use serde::{Deserialize, Serialize};

use crate::calculation::parse_time_to_seconds;
use crate::models::{Holiday, HolidayTable};

/// Lunch break excluded from worked and vacation time.
///
/// Deserialized from `{ start: "11:30", end: "13:00" }`; the time strings are
/// validated at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LunchWindowConfig", into = "LunchWindowConfig")]
pub struct LunchWindow {
    start_seconds: i64,
    end_seconds: i64,
}

impl LunchWindow {
    /// Creates a window from seconds since midnight. Returns `None` when the
    /// window is empty or reversed.
    pub fn new(start_seconds: i64, end_seconds: i64) -> Option<Self> {
        (start_seconds < end_seconds).then_some(Self {
            start_seconds,
            end_seconds,
        })
    }

    /// Start of the window in seconds since midnight.
    pub fn start_seconds(&self) -> i64 {
        self.start_seconds
    }

    /// End of the window in seconds since midnight.
    pub fn end_seconds(&self) -> i64 {
        self.end_seconds
    }
}

impl Default for LunchWindow {
    /// 11:30–13:00.
    fn default() -> Self {
        Self {
            start_seconds: 11 * 3600 + 30 * 60,
            end_seconds: 13 * 3600,
        }
    }
}

/// Raw YAML form of [`LunchWindow`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LunchWindowConfig {
    /// Start time, e.g. `"11:30"`.
    pub start: String,
    /// End time, e.g. `"13:00"`.
    pub end: String,
}

impl TryFrom<LunchWindowConfig> for LunchWindow {
    type Error = String;

    fn try_from(raw: LunchWindowConfig) -> Result<Self, Self::Error> {
        let start = parse_time_to_seconds(&raw.start)
            .ok_or_else(|| format!("invalid lunch start '{}'", raw.start))?;
        let end = parse_time_to_seconds(&raw.end)
            .ok_or_else(|| format!("invalid lunch end '{}'", raw.end))?;
        LunchWindow::new(start, end)
            .ok_or_else(|| format!("lunch window {} - {} is empty", raw.start, raw.end))
    }
}

impl From<LunchWindow> for LunchWindowConfig {
    fn from(window: LunchWindow) -> Self {
        let fmt = |s: i64| format!("{:02}:{:02}", s / 3600, (s % 3600) / 60);
        Self {
            start: fmt(window.start_seconds),
            end: fmt(window.end_seconds),
        }
    }
}

/// Overtime submission limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimePolicy {
    /// Longest overtime a single request may cover.
    pub max_minutes: i64,
    /// Shortest accepted reason, in characters.
    pub reason_min_chars: usize,
    /// Longest accepted reason, in characters.
    pub reason_max_chars: usize,
}

impl Default for OvertimePolicy {
    fn default() -> Self {
        Self {
            max_minutes: 8 * 60,
            reason_min_chars: 2,
            reason_max_chars: 500,
        }
    }
}

/// Per-type upper bounds for leave submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveLimits {
    /// Longest half-day leave (오전반휴/오후반휴).
    pub half_day_max_minutes: i64,
    /// Longest full-day leave (종일연차).
    pub full_day_max_minutes: i64,
    /// Longest single compensation leave (보상휴가).
    pub comp_leave_max_minutes: i64,
}

impl Default for LeaveLimits {
    fn default() -> Self {
        Self {
            half_day_max_minutes: 5 * 60,
            full_day_max_minutes: 8 * 60,
            comp_leave_max_minutes: 8 * 60,
        }
    }
}

/// Company work-time policy, loaded from `policy.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPolicy {
    /// Standard working hours per business day.
    pub daily_hours: u32,
    /// Lunch break excluded from worked time.
    #[serde(default)]
    pub lunch: LunchWindow,
    /// Overtime submission limits.
    #[serde(default)]
    pub overtime: OvertimePolicy,
    /// How many months ahead requests may be dated.
    pub request_horizon_months: u32,
    /// Per-type leave bounds.
    #[serde(default)]
    pub leave: LeaveLimits,
}

impl WorkPolicy {
    /// Standard minutes for one business day.
    pub fn daily_standard_minutes(&self) -> i64 {
        i64::from(self.daily_hours) * 60
    }
}

impl Default for WorkPolicy {
    /// 7-hour day, 11:30–13:00 lunch, 8h overtime cap, 3-month horizon.
    fn default() -> Self {
        Self {
            daily_hours: 7,
            lunch: LunchWindow::default(),
            overtime: OvertimePolicy::default(),
            request_horizon_months: 3,
            leave: LeaveLimits::default(),
        }
    }
}

/// Office network check used alongside the geofence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiPolicy {
    /// Whether a matching SSID alone classifies an event as in-office.
    pub enabled: bool,
    /// The office network name.
    pub ssid: String,
}

/// Office geofence, loaded from `office.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeLocation {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Office latitude.
    pub latitude: f64,
    /// Office longitude.
    pub longitude: f64,
    /// Geofence radius in meters.
    pub radius_meters: f64,
    /// Optional network check.
    #[serde(default)]
    pub wifi: Option<WifiPolicy>,
}

/// Holiday file structure (`holidays/<year>.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayFile {
    /// Holidays listed in the file.
    pub holidays: Vec<Holiday>,
}

/// The complete engine configuration.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    policy: WorkPolicy,
    office: Option<OfficeLocation>,
    holidays: HolidayTable,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(policy: WorkPolicy, office: Option<OfficeLocation>, holidays: HolidayTable) -> Self {
        Self {
            policy,
            office,
            holidays,
        }
    }

    /// Returns the work policy.
    pub fn policy(&self) -> &WorkPolicy {
        &self.policy
    }

    /// Returns the office geofence, if configured.
    pub fn office(&self) -> Option<&OfficeLocation> {
        self.office.as_ref()
    }

    /// Returns the holiday table.
    pub fn holidays(&self) -> &HolidayTable {
        &self.holidays
    }
}
