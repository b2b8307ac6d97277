//! HTTP API module for the work-time accounting engine.
//!
//! This module exposes the day, statistics, geofence, request validation and
//! calendar operations as JSON endpoints.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AnnualStatsRequest, ClassifyRequest, MemoUpdateRequest, MonthlyStatsRequest,
    OvertimeValidationRequest, StatusChangeRequest, VacationValidationRequest,
};
pub use response::{
    AnnualStatsResponse, ApiError, ApiErrorResponse, CalendarResponse, SeriesResponse,
    VacationValidationResponse,
};
pub use state::AppState;
