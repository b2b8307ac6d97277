//! Integration tests for the work-time accounting engine.
//!
//! This test suite drives the HTTP router end to end:
//! - Day summaries and event series
//! - Memo updates
//! - Monthly and annual statistics
//! - Geofence classification
//! - Overtime and vacation request validation
//! - Overtime status transitions
//! - Business-day calendar
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use worktime_engine::api::{AppState, create_router};
use worktime_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

const USER: &str = "kim@example.com";
const OFFICE: &str = "위도: 37.5362819, 경도: 126.8949029";
const BUSAN: &str = "위도: 35.1795543, 경도: 129.0756416";
const TODAY: &str = "2026-10-16";

fn create_router_for_test() -> Router {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    create_router(AppState::new(config))
}

async fn read_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    (status, json)
}

async fn post(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read_response(response).await
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read_response(response).await
}

fn event(time: &str, coordinate_text: &str) -> Value {
    json!({
        "time": time,
        "coordinateText": coordinate_text,
        "address": "서울특별시 영등포구"
    })
}

fn day_record(date: &str, start: Vec<Value>, end: Vec<Value>) -> Value {
    json!({
        "userId": USER,
        "date": date,
        "start": start,
        "gps": [],
        "end": end,
        "vacation": []
    })
}

fn office_day(date: &str) -> Value {
    day_record(
        date,
        vec![event("09:00:00", OFFICE)],
        vec![event("18:00:00", OFFICE)],
    )
}

fn overtime_request(date: &str, status: &str) -> Value {
    json!({
        "userId": USER,
        "date": date,
        "startTime": "18:00",
        "endTime": "20:00",
        "hours": "2",
        "hoursBreakdown": { "hours": 2, "minutes": 0 },
        "reason": "배포 대응",
        "status": status
    })
}

fn overtime_submission(date: &str) -> Value {
    json!({
        "userId": USER,
        "date": date,
        "startTime": "18:00",
        "endTime": "20:30",
        "client": "  고객사  ",
        "reason": "장애 대응"
    })
}

fn violations(result: &Value) -> Vec<String> {
    result["violations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// SECTION 1: Day summaries
// =============================================================================

#[tokio::test]
async fn test_full_office_day_excludes_lunch() {
    // 09:00-18:00 is 32400 s, minus the 11:30-13:00 lunch window = 27000 s
    let router = create_router_for_test();
    let (status, result) = post(router, "/days/summary", office_day("2026-03-03")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["worked_minutes"], 450);
    assert_eq!(result["vacation_minutes"], 0);
    assert_eq!(result["first_clock_in"], "09:00:00");
    assert_eq!(result["last_clock_out"], "18:00:00");
    assert_eq!(result["is_open"], false);
    assert!(result["warnings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_half_day_vacation_is_subtracted() {
    // Morning leave 09:00-13:00 overlaps the lunch window: 150 minutes of leave
    let router = create_router_for_test();
    let mut record = day_record(
        "2026-03-03",
        vec![event("09:00:00", OFFICE)],
        vec![event("18:00:00", OFFICE)],
    );
    record["vacation"] = json!([
        { "date": "2026-03-03", "start": "09:00", "end": "13:00", "type": "오전반휴" }
    ]);

    let (status, result) = post(router, "/days/summary", record).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["worked_minutes"], 300);
    assert_eq!(result["vacation_minutes"], 150);
}

#[tokio::test]
async fn test_open_day_counts_no_work() {
    let router = create_router_for_test();
    let record = day_record("2026-03-03", vec![event("09:00:00", OFFICE)], vec![]);

    let (status, result) = post(router, "/days/summary", record).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["is_open"], true);
    assert_eq!(result["worked_minutes"], 0);
}

#[tokio::test]
async fn test_korean_meridiem_times_are_parsed() {
    let router = create_router_for_test();
    let record = day_record(
        "2026-03-03",
        vec![event("오전 9:00:00", OFFICE)],
        vec![event("오후 6:00:00", OFFICE)],
    );

    let (status, result) = post(router, "/days/summary", record).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["worked_minutes"], 450);
}

// =============================================================================
// SECTION 2: Event series and memos
// =============================================================================

#[tokio::test]
async fn test_series_is_sorted_and_numbered() {
    let router = create_router_for_test();
    let record = json!({
        "userId": USER,
        "date": "2026-03-03",
        "start": [event("09:00:00", OFFICE)],
        "gps": [event("14:00:00", BUSAN), event("11:00:00", OFFICE)],
        "end": [event("18:00:00", OFFICE)]
    });

    let (status, result) = post(router, "/days/series", record).await;

    assert_eq!(status, StatusCode::OK);
    let events = result["events"].as_array().unwrap();
    assert_eq!(events.len(), 4);

    let sequence: Vec<u64> = events
        .iter()
        .map(|e| e["sequence_number"].as_u64().unwrap())
        .collect();
    assert_eq!(sequence, vec![1, 2, 3, 4]);

    let times: Vec<&str> = events
        .iter()
        .map(|e| e["event"]["time"].as_str().unwrap())
        .collect();
    assert_eq!(times, vec!["09:00:00", "11:00:00", "14:00:00", "18:00:00"]);

    assert_eq!(result["segments"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_series_drops_unparseable_times() {
    let router = create_router_for_test();
    let record = day_record(
        "2026-03-03",
        vec![event("09:00:00", OFFICE), event("later", OFFICE)],
        vec![],
    );

    let (status, result) = post(router, "/days/series", record).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["events"].as_array().unwrap().len(), 1);
    assert_eq!(result["dropped"], 1);
    assert_eq!(result["warnings"][0]["code"], "EVENT_TIME_UNPARSEABLE");
}

#[tokio::test]
async fn test_memo_update_sets_work_type() {
    let router = create_router_for_test();
    let body = json!({
        "record": office_day("2026-03-03"),
        "source": "start",
        "time": "09:00:00",
        "memo": { "project": "근태 시스템", "workType": "재택", "details": "" }
    });

    let (status, result) = post(router, "/days/memo", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["start"][0]["memo"]["workType"], "재택");
    assert_eq!(result["start"][0]["memo"]["project"], "근태 시스템");
}

#[tokio::test]
async fn test_memo_update_unknown_event_returns_404() {
    let router = create_router_for_test();
    let body = json!({
        "record": office_day("2026-03-03"),
        "source": "end",
        "time": "19:00:00",
        "memo": { "project": "", "details": "" }
    });

    let (status, result) = post(router, "/days/memo", body).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(result["code"], "EVENT_NOT_FOUND");
}

// =============================================================================
// SECTION 3: Statistics
// =============================================================================

#[tokio::test]
async fn test_empty_month_has_standard_minutes_only() {
    // March 2026: 22 weekdays, 2026-03-02 is a substitute holiday
    let router = create_router_for_test();
    let body = json!({ "year": 2026, "month": 3 });

    let (status, result) = post(router, "/stats/monthly", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["work_minutes"], 0);
    assert_eq!(result["overtime_minutes"], 0);
    assert_eq!(result["standard_minutes"], 21 * 420);
    assert_eq!(result["work_days_count"], 0);
}

#[tokio::test]
async fn test_monthly_stats_with_approved_overtime() {
    let router = create_router_for_test();
    let body = json!({
        "year": 2026,
        "month": 3,
        "day_records": [office_day("2026-03-03"), office_day("2026-03-04")],
        "overtime_requests": [
            overtime_request("2026-03-03", "approved"),
            overtime_request("2026-03-04", "pending")
        ],
        "carried_comp_minutes": 30
    });

    let (status, result) = post(router, "/stats/monthly", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["work_minutes"], 900);
    assert_eq!(result["work_days_count"], 2);
    assert_eq!(result["comp_minutes_earned"], 120);
    assert_eq!(result["comp_minutes_cumulative"], 150);
}

#[tokio::test]
async fn test_monthly_stats_rejects_invalid_month() {
    let router = create_router_for_test();
    let (status, result) = post(router, "/stats/monthly", json!({ "year": 2026, "month": 0 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_DATE");
}

#[tokio::test]
async fn test_annual_stats_averages_up_to_last_valid_month() {
    let router = create_router_for_test();
    let body = json!({
        "year": 2026,
        "day_records": [office_day("2026-01-06"), office_day("2026-03-03")]
    });

    let (status, result) = post(router, "/stats/annual", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["months"].as_array().unwrap().len(), 12);
    assert_eq!(result["kpis"]["total_work_minutes"], 900);
    assert_eq!(result["kpis"]["last_valid_month"], 3);
    assert_eq!(result["kpis"]["avg_work_minutes_per_month"], 300);
}

// =============================================================================
// SECTION 4: Geofence classification
// =============================================================================

#[tokio::test]
async fn test_office_coordinate_is_in_office() {
    let router = create_router_for_test();
    let (status, result) = post(router, "/geofence/classify", json!({ "coordinate_text": OFFICE })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["work_type"], "내근");
    assert_eq!(result["requires_manual_choice"], false);
    assert_eq!(result["matched_by"], "geofence");
}

#[tokio::test]
async fn test_far_coordinate_requires_manual_choice() {
    let router = create_router_for_test();
    let (status, result) = post(router, "/geofence/classify", json!({ "coordinate_text": BUSAN })).await;

    assert_eq!(status, StatusCode::OK);
    assert!(result["work_type"].is_null());
    assert_eq!(result["requires_manual_choice"], true);
    assert!(result["distance_meters"].as_f64().unwrap() > 300_000.0);
}

#[tokio::test]
async fn test_office_wifi_overrides_distance() {
    let router = create_router_for_test();
    let body = json!({
        "latitude": 35.1795543,
        "longitude": 129.0756416,
        "wifi": { "ssid": "OFFICE-5G" }
    });

    let (status, result) = post(router, "/geofence/classify", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["work_type"], "내근");
    assert_eq!(result["matched_by"], "wifi");
}

#[tokio::test]
async fn test_unparseable_coordinate_text_is_flagged() {
    let router = create_router_for_test();
    let body = json!({ "coordinate_text": "위치 정보 없음", "wifi": { "ssid": "OFFICE-5G" } });

    let (status, result) = post(router, "/geofence/classify", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["requires_manual_choice"], true);
    assert_eq!(result["warnings"][0]["code"], "COORDINATE_UNPARSEABLE");
}

// =============================================================================
// SECTION 5: Overtime requests
// =============================================================================

#[tokio::test]
async fn test_valid_overtime_submission_is_accepted() {
    let router = create_router_for_test();
    let body = json!({
        "submission": overtime_submission("2026-10-20"),
        "existing": [],
        "today": TODAY
    });

    let (status, result) = post(router, "/requests/overtime/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["status"], "pending");
    assert_eq!(result["client"], "고객사");
    assert_eq!(result["hoursBreakdown"]["hours"], 2);
    assert_eq!(result["hoursBreakdown"]["minutes"], 30);
}

#[tokio::test]
async fn test_past_overtime_is_rejected() {
    let router = create_router_for_test();
    let body = json!({
        "submission": overtime_submission("2026-10-15"),
        "today": TODAY
    });

    let (status, result) = post(router, "/requests/overtime/validate", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(result["code"], "VALIDATION_FAILED");
    assert!(violations(&result).iter().any(|v| v.contains("과거 날짜")));
}

#[tokio::test]
async fn test_duplicate_overtime_is_rejected() {
    let router = create_router_for_test();
    let body = json!({
        "submission": overtime_submission("2026-10-20"),
        "existing": [overtime_request("2026-10-20", "pending")],
        "today": TODAY
    });

    let (status, result) = post(router, "/requests/overtime/validate", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(violations(&result).iter().any(|v| v.contains("이미 연장근무 신청")));
}

#[tokio::test]
async fn test_cancelled_overtime_does_not_block_date() {
    let router = create_router_for_test();
    let body = json!({
        "submission": overtime_submission("2026-10-20"),
        "existing": [overtime_request("2026-10-20", "cancelled")],
        "today": TODAY
    });

    let (status, _) = post(router, "/requests/overtime/validate", body).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_overtime_collects_every_violation() {
    let router = create_router_for_test();
    let mut submission = overtime_submission("2026-10-20");
    submission["startTime"] = json!("20:00");
    submission["endTime"] = json!("18:00");
    submission["reason"] = json!("x");
    let body = json!({ "submission": submission, "today": TODAY });

    let (status, result) = post(router, "/requests/overtime/validate", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let messages = violations(&result);
    assert!(messages.iter().any(|v| v.contains("시작 시간은 종료 시간보다")));
    assert!(messages.iter().any(|v| v.contains("사유")));
}

#[tokio::test]
async fn test_pending_overtime_can_be_approved() {
    let router = create_router_for_test();
    let body = json!({
        "request": overtime_request("2026-10-20", "pending"),
        "status": "approved"
    });

    let (status, result) = post(router, "/requests/overtime/status", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["status"], "approved");
}

#[tokio::test]
async fn test_approved_overtime_cannot_be_cancelled() {
    let router = create_router_for_test();
    let body = json!({
        "request": overtime_request("2026-10-20", "approved"),
        "status": "cancelled"
    });

    let (status, result) = post(router, "/requests/overtime/status", body).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(result["code"], "INVALID_STATUS_TRANSITION");
}

// =============================================================================
// SECTION 6: Vacation requests
// =============================================================================

#[tokio::test]
async fn test_vacation_submission_is_merged() {
    let router = create_router_for_test();
    let body = json!({
        "submission": {
            "userId": USER,
            "date": "2026-10-20",
            "start": "14:00",
            "end": "18:00",
            "type": "오후반휴"
        },
        "existing": [
            { "date": "2026-10-20", "start": "15:00", "end": "18:00", "type": "오후반휴" }
        ],
        "today": TODAY
    });

    let (status, result) = post(router, "/requests/vacation/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["entry"]["start"], "14:00");
    let vacation = result["vacation"].as_array().unwrap();
    assert_eq!(vacation.len(), 1);
    assert_eq!(vacation[0]["start"], "14:00");
}

#[tokio::test]
async fn test_comp_leave_beyond_balance_is_rejected() {
    let router = create_router_for_test();
    let body = json!({
        "submission": {
            "userId": USER,
            "date": "2026-10-20",
            "start": "14:00",
            "end": "18:00",
            "type": "보상휴가"
        },
        "available_comp_minutes": 60,
        "today": TODAY
    });

    let (status, result) = post(router, "/requests/vacation/validate", body).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(violations(&result).iter().any(|v| v.contains("보상휴가 잔여 시간")));
}

#[tokio::test]
async fn test_vacation_of_other_type_replaces_same_date() {
    let router = create_router_for_test();
    let body = json!({
        "submission": {
            "userId": USER,
            "date": "2026-10-20",
            "start": "09:00",
            "end": "18:00",
            "type": "종일연차"
        },
        "existing": [
            { "date": "2026-10-20", "start": "09:00", "end": "13:00", "type": "오전반휴" },
            { "date": "2026-10-22", "start": "13:00", "end": "18:00", "type": "오후반휴" }
        ],
        "today": TODAY
    });

    let (status, result) = post(router, "/requests/vacation/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    let vacation = result["vacation"].as_array().unwrap();
    assert_eq!(vacation.len(), 2);
    assert_eq!(vacation[0]["type"], "종일연차");
    assert_eq!(vacation[1]["type"], "오후반휴");
}

#[tokio::test]
async fn test_afternoon_half_day_is_accepted() {
    let router = create_router_for_test();
    let body = json!({
        "submission": {
            "userId": USER,
            "date": "2026-10-20",
            "start": "13:00",
            "end": "18:00",
            "type": "오후반휴"
        },
        "today": TODAY
    });

    let (status, result) = post(router, "/requests/vacation/validate", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["entry"]["type"], "오후반휴");
}

#[tokio::test]
async fn test_overnight_series_starts_with_clock_in() {
    let router = create_router_for_test();
    let record = json!({
        "userId": USER,
        "date": "2026-03-03",
        "start": [event("22:00:00", OFFICE)],
        "gps": [event("23:00:00", OFFICE), event("01:00:00", OFFICE)],
        "end": [event("02:00:00", OFFICE)]
    });

    let (status, result) = post(router, "/days/series", record).await;

    assert_eq!(status, StatusCode::OK);
    let timestamps: Vec<&str> = result["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["timestamp"].as_str().unwrap())
        .collect();
    assert_eq!(
        timestamps,
        vec![
            "2026-03-03T22:00:00",
            "2026-03-03T23:00:00",
            "2026-03-04T01:00:00",
            "2026-03-04T02:00:00"
        ]
    );
}

// =============================================================================
// SECTION 7: Calendar
// =============================================================================

#[tokio::test]
async fn test_october_2026_business_days() {
    // 개천절 falls on Saturday; its substitute and 한글날 are weekdays
    let router = create_router_for_test();
    let (status, result) = get(router, "/calendar/2026/10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["weekdays"], 22);
    assert_eq!(result["business_days"], 20);
    assert_eq!(result["standard_minutes"], 8400);
}

#[tokio::test]
async fn test_calendar_without_holidays_in_month() {
    let router = create_router_for_test();
    let (status, result) = get(router, "/calendar/2026/4").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["business_days"], result["weekdays"]);
    assert!(result["holidays"].as_array().unwrap().is_empty());
}

// =============================================================================
// SECTION 8: Error cases
// =============================================================================

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let router = create_router_for_test();
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/days/summary")
                .body(Body::from(office_day("2026-03-03").to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, result) = read_response(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "MISSING_CONTENT_TYPE");
}

#[tokio::test]
async fn test_wrong_field_type_returns_malformed_json() {
    let router = create_router_for_test();
    let (status, result) = post(router, "/stats/monthly", json!({ "year": "2026", "month": 3 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "MALFORMED_JSON");
}
