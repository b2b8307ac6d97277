//! Core data models for the work-time accounting engine.
//!
//! Stored document shapes ([`DayRecord`], [`Event`], [`VacationEntry`],
//! [`OvertimeRequest`]) keep the camelCase field names of the attendance
//! store. Derived results use snake_case.

mod day_record;
mod event;
mod holiday;
mod overtime;
mod stats;
mod vacation;
mod warning;

pub use day_record::DayRecord;
pub use event::{Event, EventSource, Memo, WorkType};
pub use holiday::{Holiday, HolidayTable};
pub use overtime::{HoursBreakdown, OvertimeRequest, OvertimeSubmission, RequestStatus};
pub use stats::{AnnualKpis, MonthlyStat};
pub use vacation::{VacationEntry, VacationSubmission, VacationType};
pub use warning::{EngineWarning, WarningKind};
