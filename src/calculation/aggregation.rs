//! Monthly and annual aggregation.
//!
//! Monthly statistics are a pure function of the month's day records, the
//! user's overtime requests and the comp-leave balance carried in from the
//! previous month. They are safe to cache and rebuild at any time.

use chrono::Datelike;
use tracing::{debug, info, warn};

use crate::config::WorkPolicy;
use crate::models::{AnnualKpis, DayRecord, MonthlyStat, OvertimeRequest, RequestStatus};

use super::calendar::{HolidayCalendar, standard_minutes};
use super::day_accounting::{daily_vacation, daily_work};

/// Everything a monthly aggregation needs for one user.
#[derive(Debug, Clone, Copy)]
pub struct MonthInput<'a> {
    /// Year of the month.
    pub year: i32,
    /// Month number, 1 to 12.
    pub month: u32,
    /// The user's day records. Records dated outside the month are ignored.
    pub day_records: &'a [DayRecord],
    /// The user's overtime requests. Only approved requests in the month count.
    pub overtime_requests: &'a [OvertimeRequest],
    /// Comp-leave balance at the start of the month.
    pub carried_comp_minutes: i64,
}

/// Aggregates one month.
///
/// Overtime is the worked time beyond the month's standard minutes and is
/// never negative. Comp leave earned comes from approved overtime requests,
/// and the cumulative balance is carried-in plus earned minus used.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::{MonthInput, monthly_stats};
/// use worktime_engine::config::WorkPolicy;
/// use worktime_engine::models::HolidayTable;
///
/// let input = MonthInput {
///     year: 2026,
///     month: 7,
///     day_records: &[],
///     overtime_requests: &[],
///     carried_comp_minutes: 0,
/// };
///
/// let stat = monthly_stats(&input, &HolidayTable::default(), &WorkPolicy::default());
/// assert_eq!(stat.work_minutes, 0);
/// assert_eq!(stat.standard_minutes, 23 * 420);
/// ```
pub fn monthly_stats<C: HolidayCalendar + ?Sized>(
    input: &MonthInput<'_>,
    calendar: &C,
    policy: &WorkPolicy,
) -> MonthlyStat {
    let in_month = |year: i32, month: u32| year == input.year && month == input.month;

    let mut stat = MonthlyStat {
        year: input.year,
        month: input.month,
        standard_minutes: standard_minutes(calendar, input.year, input.month, policy.daily_hours),
        ..MonthlyStat::default()
    };

    for record in input.day_records {
        if !in_month(record.date.year(), record.date.month()) {
            warn!(
                date = %record.date,
                year = input.year,
                month = input.month,
                "Ignoring day record outside the aggregated month"
            );
            continue;
        }

        let work = daily_work(record, &policy.lunch);
        let vacation = daily_vacation(record, &policy.lunch);

        stat.work_minutes += work.minutes;
        if work.minutes > 0 {
            stat.work_days_count += 1;
        }
        stat.vacation_minutes += vacation.minutes;
        stat.used_annual_minutes += vacation.annual_minutes();
        stat.used_comp_minutes += vacation.comp_minutes();
    }

    stat.comp_minutes_earned = input
        .overtime_requests
        .iter()
        .filter(|r| r.status == RequestStatus::Approved)
        .filter(|r| in_month(r.date.year(), r.date.month()))
        .map(OvertimeRequest::duration_minutes)
        .sum();

    stat.overtime_minutes = (stat.work_minutes - stat.standard_minutes).max(0);
    stat.comp_minutes_cumulative =
        input.carried_comp_minutes + stat.comp_minutes_earned - stat.used_comp_minutes;

    debug!(
        year = stat.year,
        month = stat.month,
        work = stat.work_minutes,
        standard = stat.standard_minutes,
        comp_cumulative = stat.comp_minutes_cumulative,
        "Aggregated month"
    );

    stat
}

/// Aggregates the twelve months of a year, carrying the comp-leave balance
/// from month to month. The balance starts at zero in January.
pub fn yearly_stats<C: HolidayCalendar + ?Sized>(
    year: i32,
    day_records: &[DayRecord],
    overtime_requests: &[OvertimeRequest],
    calendar: &C,
    policy: &WorkPolicy,
) -> Vec<MonthlyStat> {
    let mut carried = 0;
    let mut stats = Vec::with_capacity(12);

    for month in 1..=12 {
        let records: Vec<DayRecord> = day_records
            .iter()
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .cloned()
            .collect();

        let stat = monthly_stats(
            &MonthInput {
                year,
                month,
                day_records: &records,
                overtime_requests,
                carried_comp_minutes: carried,
            },
            calendar,
            policy,
        );
        carried = stat.comp_minutes_cumulative;
        stats.push(stat);
    }

    info!(year, records = day_records.len(), "Aggregated year");
    stats
}

/// Derives annual indicators from monthly statistics.
///
/// The monthly average only divides by the months up to the last month with
/// any activity, so empty trailing months do not dilute it. The comp balance
/// is the cumulative balance of that last active month.
///
/// Stats belonging to another year are ignored.
pub fn annual_kpis(year: i32, stats: &[MonthlyStat]) -> AnnualKpis {
    let stats: Vec<&MonthlyStat> = stats.iter().filter(|s| s.year == year).collect();

    let last_valid = stats
        .iter()
        .filter(|s| !s.is_empty())
        .max_by_key(|s| s.month)
        .copied();
    let last_valid_month = last_valid.map(|s| s.month);

    let total_work_minutes: i64 = stats.iter().map(|s| s.work_minutes).sum();
    let months_counted = match last_valid_month {
        Some(last) => stats.iter().filter(|s| s.month <= last).count() as i64,
        None => 0,
    };
    let avg_work_minutes_per_month = if months_counted > 0 {
        total_work_minutes / months_counted
    } else {
        0
    };

    AnnualKpis {
        year,
        total_work_minutes,
        avg_work_minutes_per_month,
        total_comp_minutes: stats.iter().map(|s| s.comp_minutes_earned).sum(),
        used_annual_minutes: stats.iter().map(|s| s.used_annual_minutes).sum(),
        used_comp_minutes: stats.iter().map(|s| s.used_comp_minutes).sum(),
        total_overtime_minutes: stats.iter().map(|s| s.overtime_minutes).sum(),
        standard_minutes: stats.iter().map(|s| s.standard_minutes).sum(),
        comp_balance_minutes: last_valid.map_or(0, |s| s.comp_minutes_cumulative),
        last_valid_month,
    }
}
