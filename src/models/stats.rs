//! Aggregated statistics models.
//!
//! Both types are derived data. They can always be rebuilt from the day
//! records and requests they were computed from.

use serde::{Deserialize, Serialize};

/// Worked, leave and overtime totals for one calendar month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStat {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Sum of daily worked minutes.
    pub work_minutes: i64,
    /// Sum of daily vacation minutes (lunch excluded).
    pub vacation_minutes: i64,
    /// `max(0, work_minutes - standard_minutes)`.
    pub overtime_minutes: i64,
    /// Business days in the month times the standard daily minutes.
    pub standard_minutes: i64,
    /// Days with a positive worked duration.
    pub work_days_count: u32,
    /// Leave minutes drawn from the annual allowance (half-day and full-day).
    pub used_annual_minutes: i64,
    /// Compensation leave minutes used.
    pub used_comp_minutes: i64,
    /// Compensation minutes accrued from approved overtime dated in this month.
    pub comp_minutes_earned: i64,
    /// Compensation balance at month end: carried in + earned - used.
    pub comp_minutes_cumulative: i64,
}

impl MonthlyStat {
    /// True when every metric other than the standard is zero.
    pub fn is_empty(&self) -> bool {
        self.work_minutes == 0
            && self.vacation_minutes == 0
            && self.used_annual_minutes == 0
            && self.used_comp_minutes == 0
            && self.comp_minutes_earned == 0
    }
}

/// Year-level KPIs derived from twelve monthly stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualKpis {
    /// Calendar year.
    pub year: i32,
    /// Worked minutes over the year.
    pub total_work_minutes: i64,
    /// Average worked minutes per month, up to the last month with data.
    pub avg_work_minutes_per_month: i64,
    /// Compensation minutes accrued over the year.
    pub total_comp_minutes: i64,
    /// Annual leave minutes used.
    pub used_annual_minutes: i64,
    /// Compensation leave minutes used.
    pub used_comp_minutes: i64,
    /// Overtime minutes over the year.
    pub total_overtime_minutes: i64,
    /// Standard minutes over the year.
    pub standard_minutes: i64,
    /// Compensation balance at the end of the last month with data.
    pub comp_balance_minutes: i64,
    /// The last month carrying any nonzero metric, if any.
    pub last_valid_month: Option<u32>,
}
