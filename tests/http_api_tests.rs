#![cfg(feature = "http_api")]

use attendance_calendar::{AttendanceCalendar, http_api};
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    response::Response,
};
use chrono::NaiveDate;
use serde_json::{Value, json};
use tower::util::ServiceExt;

fn new_router() -> axum::Router {
    let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
    let state = http_api::AppState::new(AttendanceCalendar::in_memory()).with_today(today);
    http_api::router(state)
}

async fn get(app: &axum::Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post(app: &axum::Router, uri: &str, payload: Value) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = new_router();
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn rules_endpoint_reports_swap_status() {
    let app = new_router();

    let response = get(&app, "/api/rules?year=2025").await;
    assert_eq!(response.status(), StatusCode::OK);
    let rules = json_body(response).await;
    assert_eq!(rules["swap_status"], "ok");
    assert_eq!(rules["working_weekends"][0], "2025-05-17");
    assert!(
        rules["public_holidays"]
            .as_array()
            .unwrap()
            .contains(&json!("2025-04-18"))
    );

    let missing = json_body(get(&app, "/api/rules?year=2030").await).await;
    assert_eq!(missing["swap_status"], "missing");
    assert_eq!(missing["working_weekends"], json!([]));

    // Year defaults to the current one.
    let current = json_body(get(&app, "/api/rules").await).await;
    assert_eq!(current["year"], 2025);
}

#[tokio::test]
async fn out_of_range_year_is_a_bad_request() {
    let app = new_router();
    let response = get(&app, "/api/rules?year=1200").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "invalid_request");
}

#[tokio::test]
async fn weekend_write_is_locked() {
    let app = new_router();
    let response = post(
        &app,
        "/api/day",
        json!({ "date": "2025-05-03", "state": "office" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["error"], "day_locked");
    assert_eq!(body["message"], "day is not editable: weekend");

    let days = json_body(get(&app, "/api/days?year=2025&month=5").await).await;
    assert_eq!(days["days"]["3"], "empty");
}

#[tokio::test]
async fn set_day_updates_stats() {
    let app = new_router();
    let response = post(
        &app,
        "/api/day",
        json!({ "date": "2025-05-05", "state": "office" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let update = json_body(response).await;
    assert_eq!(update["success"], true);
    assert_eq!(update["state"], "office");

    let stats = json_body(get(&app, "/api/stats?year=2025&month=5").await).await;
    assert_eq!(stats["total_working_days"], 21);
    assert_eq!(stats["office"], 5); // 1/21
    assert_eq!(stats["home"], 0);
    assert_eq!(stats["meets_office_target"], false);

    let yearly = json_body(get(&app, "/api/stats?year=2025").await).await;
    assert_eq!(yearly["total_working_days"], 252);
    assert!(yearly.get("month").is_none());
}

#[tokio::test]
async fn malformed_requests_are_rejected() {
    let app = new_router();
    let response = post(
        &app,
        "/api/day",
        json!({ "date": "2025-02-30", "state": "office" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "invalid_request");

    let response = post(
        &app,
        "/api/day",
        json!({ "date": "2025-05-05", "state": "gym" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/stats?year=2025&month=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cycle_advances_through_states() {
    let app = new_router();
    let mut seen = Vec::new();
    for _ in 0..4 {
        let response = post(&app, "/api/day/cycle", json!({ "date": "2025-05-06" })).await;
        assert_eq!(response.status(), StatusCode::OK);
        seen.push(json_body(response).await["state"].clone());
    }
    assert_eq!(seen, vec![json!("office"), json!("home"), json!("day_off"), json!("empty")]);

    let response = post(&app, "/api/day/cycle", json!({ "date": "2025-05-01" })).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn editable_endpoint_explains_blocks() {
    let app = new_router();

    let open = json_body(get(&app, "/api/editable?date=2025-05-17").await).await;
    assert_eq!(open["editable"], true);
    assert!(open.get("blocked_by").is_none());

    let rest = json_body(get(&app, "/api/editable?date=2025-05-02").await).await;
    assert_eq!(rest["editable"], false);
    assert_eq!(rest["blocked_by"], "rest_day");
    assert_eq!(rest["month_locked"], false);
}

#[tokio::test]
async fn editable_endpoint_reports_month_lock() {
    let mut calendar = AttendanceCalendar::in_memory();
    calendar.set_lock_past_months(true);
    let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
    let app = http_api::router(http_api::AppState::new(calendar).with_today(today));

    let april = json_body(get(&app, "/api/editable?date=2025-04-07").await).await;
    assert_eq!(april["editable"], false);
    assert_eq!(april["month_locked"], true);
    assert!(april.get("blocked_by").is_none());

    let may = json_body(get(&app, "/api/editable?date=2025-05-05").await).await;
    assert_eq!(may["editable"], true);
    assert_eq!(may["month_locked"], false);

    let response = post(
        &app,
        "/api/day",
        json!({ "date": "2025-04-07", "state": "home" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "day_locked");
}

#[tokio::test]
async fn pinned_today_drives_default_period() {
    let pinned = NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
    let state = http_api::AppState::new(AttendanceCalendar::in_memory())
        .with_today_override(Some(pinned));
    let app = http_api::router(state);

    let days = json_body(get(&app, "/api/days").await).await;
    assert_eq!(days["year"], 2026);
    assert_eq!(days["month"], 8);
    let rules = json_body(get(&app, "/api/rules").await).await;
    assert_eq!(rules["year"], 2026);

    let unpinned = http_api::router(
        http_api::AppState::new(AttendanceCalendar::in_memory()).with_today_override(None),
    );
    let response = get(&unpinned, "/api/rules").await;
    assert_eq!(response.status(), StatusCode::OK);
}
