//! Calculation logic for the work-time accounting engine.
//!
//! This module contains the business-day calendar, time-string and interval
//! arithmetic, duration formatting, event series reconstruction, geofence
//! classification, per-day accounting, monthly and annual aggregation, and
//! request validation. Every function is synchronous and pure.

mod aggregation;
mod calendar;
mod day_accounting;
mod duration_format;
mod event_series;
mod geofence;
mod interval;
mod request_validation;

pub use aggregation::{MonthInput, annual_kpis, monthly_stats, yearly_stats};
pub use calendar::{
    DEFAULT_DAILY_HOURS, HolidayCalendar, annual_standard_minutes, business_day_count, is_weekday,
    month_days, standard_minutes, weekday_count,
};
pub use day_accounting::{
    DailyVacation, DailyWork, DaySummary, daily_vacation, daily_vacation_minutes, daily_work,
    daily_worked_minutes, summarize_day,
};
pub use duration_format::{
    format_duration, format_half_hours, parse_duration_to_minutes, round_to_half_hour,
};
pub use event_series::{
    DayClock, EventSeries, PathSegment, ProcessedEvent, build_event_series,
    first_clock_in_seconds, is_valid_coordinate, parse_coordinates, path_segments,
};
pub use geofence::{
    Classification, EARTH_RADIUS_METERS, MatchReason, WifiSignal, classify,
    classify_coordinate_text, classify_detailed, distance_meters,
};
pub use interval::{
    SECONDS_PER_DAY, WorkedTime, format_clock, lunch_excluded_length, merge_intervals, overlap,
    parse_time_to_seconds, worked_seconds,
};
pub use request_validation::{merge_vacation_entry, validate_overtime, validate_vacation};
