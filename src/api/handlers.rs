//! HTTP request handlers for the work-time accounting API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! handler logs a correlation id and its elapsed time.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    HolidayCalendar, MonthInput, annual_kpis, build_event_series, business_day_count,
    classify_coordinate_text, classify_detailed, merge_vacation_entry, monthly_stats,
    path_segments, standard_minutes, summarize_day, validate_overtime, validate_vacation,
    weekday_count, yearly_stats,
};
use crate::error::EngineError;
use crate::models::DayRecord;

use super::request::{
    AnnualStatsRequest, ClassifyRequest, MemoUpdateRequest, MonthlyStatsRequest,
    OvertimeValidationRequest, StatusChangeRequest, VacationValidationRequest,
};
use super::response::{
    AnnualStatsResponse, ApiError, ApiErrorResponse, CalendarResponse, SeriesResponse,
    VacationValidationResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/days/summary", post(day_summary_handler))
        .route("/days/series", post(day_series_handler))
        .route("/days/memo", post(memo_update_handler))
        .route("/stats/monthly", post(monthly_stats_handler))
        .route("/stats/annual", post(annual_stats_handler))
        .route("/geofence/classify", post(classify_handler))
        .route("/requests/overtime/validate", post(overtime_validation_handler))
        .route("/requests/overtime/status", post(status_change_handler))
        .route("/requests/vacation/validate", post(vacation_validation_handler))
        .route("/calendar/:year/:month", get(calendar_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Unwraps a JSON body or builds the 400 response for it.
fn extract<T>(correlation_id: Uuid, payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };

    Err(error_response(ApiErrorResponse::bad_request(error)))
}

fn engine_error(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    error_response(err.into())
}

fn reference_date(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

fn check_month(year: i32, month: u32) -> Result<(), EngineError> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(EngineError::InvalidDate {
            value: format!("{year}-{month:02}"),
        })
    }
}

/// Handler for POST /days/summary.
async fn day_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<DayRecord>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing day summary request");

    let record = match extract(correlation_id, payload) {
        Ok(record) => record,
        Err(response) => return response,
    };

    let started = Instant::now();
    let summary = summarize_day(&record, &state.config().policy().lunch);
    info!(
        correlation_id = %correlation_id,
        user_id = %record.user_id,
        date = %record.date,
        worked_minutes = summary.worked_minutes,
        warnings = summary.warnings.len(),
        duration_us = started.elapsed().as_micros(),
        "Day summary completed"
    );

    json_response(StatusCode::OK, summary)
}

/// Handler for POST /days/series.
async fn day_series_handler(payload: Result<Json<DayRecord>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing event series request");

    let record = match extract(correlation_id, payload) {
        Ok(record) => record,
        Err(response) => return response,
    };

    let started = Instant::now();
    let series = build_event_series(&record);
    let segments = path_segments(&series);
    info!(
        correlation_id = %correlation_id,
        user_id = %record.user_id,
        date = %record.date,
        events = series.len(),
        dropped = series.dropped,
        duration_us = started.elapsed().as_micros(),
        "Event series completed"
    );

    json_response(StatusCode::OK, SeriesResponse { series, segments })
}

/// Handler for POST /days/memo.
async fn memo_update_handler(payload: Result<Json<MemoUpdateRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing memo update request");

    let request = match extract(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut record = request.record;
    match record.update_memo(request.source, &request.time, request.memo) {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                user_id = %record.user_id,
                date = %record.date,
                source = %request.source,
                time = %request.time,
                "Memo updated"
            );
            json_response(StatusCode::OK, record)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /stats/monthly.
async fn monthly_stats_handler(
    State(state): State<AppState>,
    payload: Result<Json<MonthlyStatsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing monthly stats request");

    let request = match extract(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };
    if let Err(err) = check_month(request.year, request.month) {
        return engine_error(correlation_id, err);
    }

    let started = Instant::now();
    let config = state.config();
    let input = MonthInput {
        year: request.year,
        month: request.month,
        day_records: &request.day_records,
        overtime_requests: &request.overtime_requests,
        carried_comp_minutes: request.carried_comp_minutes,
    };
    let stat = monthly_stats(&input, config.holidays(), config.policy());
    info!(
        correlation_id = %correlation_id,
        year = stat.year,
        month = stat.month,
        records = request.day_records.len(),
        work_minutes = stat.work_minutes,
        duration_us = started.elapsed().as_micros(),
        "Monthly stats completed"
    );

    json_response(StatusCode::OK, stat)
}

/// Handler for POST /stats/annual.
async fn annual_stats_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnnualStatsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing annual stats request");

    let request = match extract(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let started = Instant::now();
    let config = state.config();
    let months = yearly_stats(
        request.year,
        &request.day_records,
        &request.overtime_requests,
        config.holidays(),
        config.policy(),
    );
    let kpis = annual_kpis(request.year, &months);
    info!(
        correlation_id = %correlation_id,
        year = request.year,
        total_work_minutes = kpis.total_work_minutes,
        last_valid_month = ?kpis.last_valid_month,
        duration_us = started.elapsed().as_micros(),
        "Annual stats completed"
    );

    json_response(StatusCode::OK, AnnualStatsResponse { months, kpis })
}

/// Handler for POST /geofence/classify.
async fn classify_handler(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing classification request");

    let request = match extract(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let office = state.config().office();
    let wifi = request.wifi.as_ref();
    let result = match (&request.coordinate_text, request.latitude, request.longitude) {
        (Some(text), _, _) => classify_coordinate_text(text, office, wifi),
        (None, Some(latitude), Some(longitude)) => {
            classify_detailed(latitude, longitude, office, wifi)
        }
        _ => {
            warn!(correlation_id = %correlation_id, "Classification request without a coordinate");
            return error_response(ApiErrorResponse::bad_request(ApiError::validation_error(
                "coordinate_text or latitude and longitude are required",
            )));
        }
    };

    info!(
        correlation_id = %correlation_id,
        work_type = ?result.work_type,
        distance_meters = ?result.distance_meters,
        "Classification completed"
    );

    json_response(StatusCode::OK, result)
}

/// Handler for POST /requests/overtime/validate.
async fn overtime_validation_handler(
    State(state): State<AppState>,
    payload: Result<Json<OvertimeValidationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing overtime validation request");

    let request = match extract(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let today = reference_date(request.today);
    match validate_overtime(
        &request.submission,
        today,
        &request.existing,
        state.config().policy(),
    ) {
        Ok(accepted) => {
            info!(
                correlation_id = %correlation_id,
                user_id = %accepted.user_id,
                date = %accepted.date,
                hours = %accepted.hours,
                "Overtime submission accepted"
            );
            json_response(StatusCode::OK, accepted)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /requests/overtime/status.
async fn status_change_handler(
    payload: Result<Json<StatusChangeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing status change request");

    let request = match extract(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let mut overtime = request.request;
    let from = overtime.status;
    match overtime.set_status(request.status) {
        Ok(()) => {
            info!(
                correlation_id = %correlation_id,
                user_id = %overtime.user_id,
                date = %overtime.date,
                %from,
                to = %overtime.status,
                "Overtime status changed"
            );
            json_response(StatusCode::OK, overtime)
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /requests/vacation/validate.
async fn vacation_validation_handler(
    State(state): State<AppState>,
    payload: Result<Json<VacationValidationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing vacation validation request");

    let request = match extract(correlation_id, payload) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let today = reference_date(request.today);
    match validate_vacation(
        &request.submission,
        today,
        &request.existing,
        request.available_comp_minutes,
        state.config().policy(),
    ) {
        Ok(entry) => {
            let vacation = merge_vacation_entry(&request.existing, entry.clone());
            info!(
                correlation_id = %correlation_id,
                user_id = %request.submission.user_id,
                date = %entry.date,
                vacation_type = %entry.vacation_type,
                entries = vacation.len(),
                "Vacation submission accepted"
            );
            json_response(StatusCode::OK, VacationValidationResponse { entry, vacation })
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /calendar/:year/:month.
async fn calendar_handler(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, year, month, "Processing calendar request");

    if let Err(err) = check_month(year, month) {
        return engine_error(correlation_id, err);
    }

    let config = state.config();
    let holidays = config.holidays();
    if holidays.is_empty() {
        warn!(correlation_id = %correlation_id, "No holiday table loaded, every weekday is a business day");
    }

    let response = CalendarResponse {
        year,
        month,
        weekdays: weekday_count(year, month),
        business_days: business_day_count(holidays, year, month),
        standard_minutes: standard_minutes(holidays, year, month, config.policy().daily_hours),
        holidays: holidays.holidays_in_month(year, month),
    };

    json_response(StatusCode::OK, response)
}
