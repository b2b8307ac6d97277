//! Response types for the work-time accounting API.
//!
//! This module defines the success bodies that wrap engine results and the
//! error response structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::{EventSeries, PathSegment};
use crate::error::EngineError;
use crate::models::{AnnualKpis, Holiday, MonthlyStat, VacationEntry};

/// Response body for `POST /days/series`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesResponse {
    /// The chronological event series.
    #[serde(flatten)]
    pub series: EventSeries,
    /// Legs between consecutive events.
    pub segments: Vec<PathSegment>,
}

/// Response body for `POST /stats/annual`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualStatsResponse {
    /// January to December.
    pub months: Vec<MonthlyStat>,
    /// Year-level indicators.
    pub kpis: AnnualKpis,
}

/// Response body for `GET /calendar/:year/:month`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarResponse {
    /// The year.
    pub year: i32,
    /// The month.
    pub month: u32,
    /// Monday to Friday dates in the month.
    pub weekdays: u32,
    /// Weekdays that are not holidays.
    pub business_days: u32,
    /// Business days times the policy's daily hours.
    pub standard_minutes: i64,
    /// Holidays in the month.
    pub holidays: Vec<Holiday>,
}

/// Response body for `POST /requests/vacation/validate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationValidationResponse {
    /// The accepted entry.
    pub entry: VacationEntry,
    /// The user's vacation list with the entry merged in.
    pub vacation: Vec<VacationEntry>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Individual rule violations, for validation failures.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            violations: Vec::new(),
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(code, message)
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response with the given body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidTime { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_TIME", message))
            }
            EngineError::InvalidDate { .. } => {
                ApiErrorResponse::bad_request(ApiError::new("INVALID_DATE", message))
            }
            EngineError::EventNotFound { .. } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new("EVENT_NOT_FOUND", message),
            },
            EngineError::InvalidStatusTransition { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::new("INVALID_STATUS_TRANSITION", message),
            },
            EngineError::ValidationFailed { messages } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError {
                    violations: messages,
                    ..ApiError::new("VALIDATION_FAILED", message)
                },
            },
            EngineError::CalculationError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            },
        }
    }
}
