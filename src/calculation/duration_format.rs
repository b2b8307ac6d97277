//! Human-readable duration strings.
//!
//! Durations are displayed as `"H시간 M분"` with zero components omitted.
//! Decimal hour values for reports are rounded to the nearest half hour.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

static DURATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-)?\s*(?:(\d+)\s*시간)?\s*(?:(\d+)\s*분)?$").expect("duration pattern")
});

/// Half an hour expressed in hours.
const HALF_HOUR: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Renders minutes as `"H시간 M분"`.
///
/// Zero components are omitted; zero itself renders as `"0분"`. Negative
/// values carry a leading minus sign.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::format_duration;
///
/// assert_eq!(format_duration(450), "7시간 30분");
/// assert_eq!(format_duration(120), "2시간");
/// assert_eq!(format_duration(45), "45분");
/// assert_eq!(format_duration(0), "0분");
/// assert_eq!(format_duration(-90), "-1시간 30분");
/// ```
pub fn format_duration(minutes: i64) -> String {
    if minutes == 0 {
        return "0분".to_string();
    }

    let sign = if minutes < 0 { "-" } else { "" };
    let total = minutes.unsigned_abs();
    let (hours, rest) = (total / 60, total % 60);

    match (hours, rest) {
        (0, m) => format!("{sign}{m}분"),
        (h, 0) => format!("{sign}{h}시간"),
        (h, m) => format!("{sign}{h}시간 {m}분"),
    }
}

/// Parses a `"H시간 M분"` string back into minutes.
///
/// Either component may be missing and whitespace between them is optional.
/// Returns `None` for an empty or malformed string.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::parse_duration_to_minutes;
///
/// assert_eq!(parse_duration_to_minutes("7시간 30분"), Some(450));
/// assert_eq!(parse_duration_to_minutes("7시간30분"), Some(450));
/// assert_eq!(parse_duration_to_minutes("45분"), Some(45));
/// assert_eq!(parse_duration_to_minutes("soon"), None);
/// ```
pub fn parse_duration_to_minutes(text: &str) -> Option<i64> {
    let captures = DURATION_PATTERN.captures(text.trim())?;
    let hours = captures.get(2);
    let minutes = captures.get(3);
    if hours.is_none() && minutes.is_none() {
        return None;
    }

    let hours: i64 = hours.map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let minutes: i64 = minutes.map_or(Ok(0), |m| m.as_str().parse()).ok()?;
    let total = hours.checked_mul(60)?.checked_add(minutes)?;

    Some(if captures.get(1).is_some() { -total } else { total })
}

/// Converts minutes to hours rounded to the nearest half hour.
///
/// Ties round away from zero, so 15 minutes becomes 0.5 hours.
///
/// # Example
///
/// ```
/// use worktime_engine::calculation::round_to_half_hour;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_to_half_hour(450), Decimal::from_str("7.5").unwrap());
/// assert_eq!(round_to_half_hour(440), Decimal::from_str("7.5").unwrap());
/// assert_eq!(round_to_half_hour(14), Decimal::ZERO);
/// ```
pub fn round_to_half_hour(minutes: i64) -> Decimal {
    let half_hours = (Decimal::from(minutes) / Decimal::from(30))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (half_hours * HALF_HOUR).normalize()
}

/// Renders minutes as decimal hours rounded to the half hour, e.g. `"7.5시간"`.
pub fn format_half_hours(minutes: i64) -> String {
    format!("{}시간", round_to_half_hour(minutes))
}
