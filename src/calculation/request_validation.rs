//! Overtime and vacation request validation.
//!
//! Every rule is checked and every violation is reported together, so the
//! user can fix a submission in one pass. A submission that passes becomes a
//! pending [`OvertimeRequest`] or a [`VacationEntry`].

use chrono::{Months, NaiveDate};
use tracing::{debug, info, warn};

use crate::config::WorkPolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    OvertimeRequest, OvertimeSubmission, VacationEntry, VacationSubmission, VacationType,
};

use super::duration_format::format_duration;
use super::interval::{lunch_excluded_length, parse_time_to_seconds};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Checks the requested date against today and the request horizon.
///
/// Returns the parsed date when it is well-formed, even if it lies outside
/// the window, so later checks can still use it.
fn check_date_window(
    raw: &str,
    today: NaiveDate,
    horizon_months: u32,
    violations: &mut Vec<String>,
) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .filter(|d| d.format(DATE_FORMAT).to_string() == raw);
    let Some(date) = date else {
        violations.push("날짜 형식이 올바르지 않습니다 (YYYY-MM-DD)".to_string());
        return None;
    };

    // Canonical YYYY-MM-DD strings order the same as the dates they encode
    let today_text = today.format(DATE_FORMAT).to_string();
    if raw < today_text.as_str() {
        violations.push("과거 날짜에는 신청할 수 없습니다".to_string());
    }

    let horizon = today.checked_add_months(Months::new(horizon_months));
    if horizon.is_none_or(|limit| date > limit) {
        violations.push(format!("{horizon_months}개월 이후의 날짜는 신청할 수 없습니다"));
    }

    Some(date)
}

/// Parses the start and end times and checks their order.
fn check_time_range(start: &str, end: &str, violations: &mut Vec<String>) -> Option<(i64, i64)> {
    let start = parse_time_to_seconds(start);
    let end = parse_time_to_seconds(end);
    if start.is_none() {
        violations.push("시작 시간 형식이 올바르지 않습니다".to_string());
    }
    if end.is_none() {
        violations.push("종료 시간 형식이 올바르지 않습니다".to_string());
    }
    let (start, end) = (start?, end?);

    if start >= end {
        violations.push("시작 시간은 종료 시간보다 빨라야 합니다".to_string());
    }
    Some((start, end))
}

fn reject(kind: &str, user_id: &str, violations: Vec<String>) -> EngineError {
    warn!(
        kind,
        user_id,
        violations = violations.len(),
        "Request rejected"
    );
    EngineError::ValidationFailed {
        messages: violations,
    }
}

/// Validates an overtime submission.
///
/// Rules:
/// - the date is `YYYY-MM-DD`, not in the past and within the request horizon
/// - start and end parse and start is strictly before end
/// - the duration is positive and at most the policy maximum
/// - the reason has between the policy's minimum and maximum characters
/// - the user has no other non-cancelled request on that date
///
/// # Errors
///
/// Returns [`EngineError::ValidationFailed`] listing every violated rule.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::validate_overtime;
/// use worktime_engine::config::WorkPolicy;
/// use worktime_engine::models::OvertimeSubmission;
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
/// let submission = OvertimeSubmission {
///     user_id: "kim@example.com".to_string(),
///     date: "2026-10-01".to_string(),
///     start_time: "18:00".to_string(),
///     end_time: "20:00".to_string(),
///     client: None,
///     reason: "배포 대응".to_string(),
/// };
///
/// let err = validate_overtime(&submission, today, &[], &WorkPolicy::default()).unwrap_err();
/// assert!(err.to_string().contains("과거 날짜"));
/// ```
pub fn validate_overtime(
    submission: &OvertimeSubmission,
    today: NaiveDate,
    existing: &[OvertimeRequest],
    policy: &WorkPolicy,
) -> EngineResult<OvertimeRequest> {
    let mut violations = Vec::new();

    let date = check_date_window(
        &submission.date,
        today,
        policy.request_horizon_months,
        &mut violations,
    );

    let minutes = check_time_range(&submission.start_time, &submission.end_time, &mut violations)
        .map(|(start, end)| (end - start) / 60);
    if let Some(minutes) = minutes {
        if minutes <= 0 {
            violations.push("연장근무 시간은 0보다 커야 합니다".to_string());
        } else if minutes > policy.overtime.max_minutes {
            violations.push(format!(
                "연장근무는 최대 {}까지 신청할 수 있습니다",
                format_duration(policy.overtime.max_minutes)
            ));
        }
    }

    let reason_chars = submission.reason.trim().chars().count();
    let (min_chars, max_chars) = (policy.overtime.reason_min_chars, policy.overtime.reason_max_chars);
    if !(min_chars..=max_chars).contains(&reason_chars) {
        violations.push(format!(
            "사유는 {min_chars}자 이상 {max_chars}자 이하로 입력해야 합니다"
        ));
    }

    if let Some(date) = date {
        let duplicate = existing
            .iter()
            .any(|r| r.user_id == submission.user_id && r.date == date && r.is_active());
        if duplicate {
            violations.push("해당 날짜에 이미 연장근무 신청이 있습니다".to_string());
        }
    }

    match (date, minutes) {
        (Some(date), Some(minutes)) if violations.is_empty() => {
            info!(
                user_id = %submission.user_id,
                %date,
                minutes,
                "Overtime request accepted"
            );
            Ok(OvertimeRequest::from_submission(submission, date, minutes))
        }
        _ => Err(reject("overtime", &submission.user_id, violations)),
    }
}

/// Upper bound in minutes for one leave of the given type.
fn leave_limit(policy: &WorkPolicy, vacation_type: VacationType) -> i64 {
    match vacation_type {
        VacationType::HalfDayAm | VacationType::HalfDayPm => policy.leave.half_day_max_minutes,
        VacationType::FullDay => policy.leave.full_day_max_minutes,
        VacationType::CompLeave => policy.leave.comp_leave_max_minutes,
    }
}

/// Validates a vacation submission against the user's existing entries.
///
/// Rules:
/// - the date window of [`validate_overtime`]
/// - start and end parse and start is strictly before end
/// - the leave, excluding lunch, is positive and within the type's limit
/// - comp leave does not exceed `available_comp_minutes` when supplied
///
/// Entries are keyed by date. An existing entry on the same date is never a
/// conflict: the new entry replaces it (see [`merge_vacation_entry`]), and
/// comp leave held by the replaced entry counts as available again.
///
/// # Errors
///
/// Returns [`EngineError::ValidationFailed`] listing every violated rule.
pub fn validate_vacation(
    submission: &VacationSubmission,
    today: NaiveDate,
    existing: &[VacationEntry],
    available_comp_minutes: Option<i64>,
    policy: &WorkPolicy,
) -> EngineResult<VacationEntry> {
    let mut violations = Vec::new();

    let date = check_date_window(
        &submission.date,
        today,
        policy.request_horizon_months,
        &mut violations,
    );
    let range = check_time_range(&submission.start, &submission.end, &mut violations);

    if let Some((start, end)) = range {
        let minutes = lunch_excluded_length(start, end, &policy.lunch) / 60;
        let limit = leave_limit(policy, submission.vacation_type);
        if start < end && minutes <= 0 {
            violations.push("휴가 시간이 점심시간과 겹쳐 0분입니다".to_string());
        }
        if minutes > limit {
            violations.push(format!(
                "{}는 최대 {}까지 신청할 수 있습니다",
                submission.vacation_type,
                format_duration(limit)
            ));
        }
        if submission.vacation_type == VacationType::CompLeave {
            let released = date.map_or(0, |date| replaced_comp_minutes(existing, date, policy));
            if let Some(available) = available_comp_minutes.map(|a| a + released) {
                if minutes > available {
                    violations.push(format!(
                        "보상휴가 잔여 시간({})을 초과했습니다",
                        format_duration(available.max(0))
                    ));
                }
            }
        }
    }

    match date {
        Some(date) if violations.is_empty() => {
            info!(
                user_id = %submission.user_id,
                %date,
                vacation_type = %submission.vacation_type,
                "Vacation request accepted"
            );
            Ok(VacationEntry {
                date,
                start: submission.start.trim().to_string(),
                end: submission.end.trim().to_string(),
                vacation_type: submission.vacation_type,
            })
        }
        _ => Err(reject("vacation", &submission.user_id, violations)),
    }
}

/// Comp-leave minutes booked on `date`, which a new submission would replace.
fn replaced_comp_minutes(existing: &[VacationEntry], date: NaiveDate, policy: &WorkPolicy) -> i64 {
    existing
        .iter()
        .filter(|e| e.date == date && e.vacation_type == VacationType::CompLeave)
        .filter_map(|e| Some((parse_time_to_seconds(&e.start)?, parse_time_to_seconds(&e.end)?)))
        .map(|(start, end)| lunch_excluded_length(start, end, &policy.lunch) / 60)
        .sum()
}

/// Adds an entry to a vacation list, replacing the entry stored for the same
/// date in place. Extra entries on that date are dropped.
pub fn merge_vacation_entry(existing: &[VacationEntry], entry: VacationEntry) -> Vec<VacationEntry> {
    let date = entry.date;
    let mut pending = Some(entry);
    let mut merged = Vec::with_capacity(existing.len() + 1);
    for current in existing {
        if current.date != date {
            merged.push(current.clone());
        } else if let Some(entry) = pending.take() {
            debug!(%date, replaced = %current.vacation_type, "Replacing vacation entry");
            merged.push(entry);
        }
    }
    merged.extend(pending);
    merged
}
