use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::calendar::{BlockReason, EditRejection};
use crate::day_state::DayState;
use crate::tracker::{
    AttendanceCalendar, MonthStates, StatsReport, TrackerError, YearRules, validate_year,
};

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    calendar: Arc<AttendanceCalendar>,
    today: Clock,
}

impl AppState {
    pub fn new(calendar: AttendanceCalendar) -> Self {
        Self::with_shared(Arc::new(calendar))
    }

    pub fn with_shared(calendar: Arc<AttendanceCalendar>) -> Self {
        Self {
            calendar,
            today: Arc::new(|| Local::now().date_naive()),
        }
    }

    /// Pin "today" to a fixed date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Arc::new(move || today);
        self
    }

    /// Pin "today" when `today` is set, otherwise keep the local clock.
    pub fn with_today_override(self, today: Option<NaiveDate>) -> Self {
        match today {
            Some(today) => self.with_today(today),
            None => self,
        }
    }

    fn calendar(&self) -> Arc<AttendanceCalendar> {
        self.calendar.clone()
    }

    fn today(&self) -> NaiveDate {
        (self.today)()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    Locked(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }
}

impl From<TrackerError> for ApiError {
    fn from(value: TrackerError) -> Self {
        match value {
            invalid @ (TrackerError::YearOutOfRange(_) | TrackerError::InvalidMonth(_)) => {
                ApiError::Invalid(invalid.to_string())
            }
            TrackerError::Rejected(rejection) => ApiError::Locked(rejection.to_string()),
            TrackerError::Persistence(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::Locked(message) => (StatusCode::CONFLICT, "day_locked", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct YearQuery {
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct PeriodQuery {
    year: Option<i32>,
    month: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: String,
}

#[derive(Debug, Deserialize)]
struct SetDayPayload {
    date: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct CycleDayPayload {
    date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DayUpdate {
    pub success: bool,
    pub date: NaiveDate,
    pub state: DayState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Editability {
    pub date: NaiveDate,
    pub editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_by: Option<BlockReason>,
    pub month_locked: bool,
}

fn parse_iso_date(input: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| ApiError::invalid(format!("invalid date '{input}': {e}")))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/rules", get(get_year_rules))
        .route("/api/stats", get(get_stats))
        .route("/api/days", get(get_days))
        .route("/api/day", post(set_day))
        .route("/api/day/cycle", post(cycle_day))
        .route("/api/editable", get(get_editable))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "attendance calendar HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_year_rules(
    State(state): State<AppState>,
    Query(query): Query<YearQuery>,
) -> Result<Json<YearRules>, ApiError> {
    let year = query.year.unwrap_or_else(|| state.today().year());
    let rules = state.calendar().year_rules(year)?;
    Ok(Json(rules))
}

async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<StatsReport>, ApiError> {
    let year = query.year.unwrap_or_else(|| state.today().year());
    let report = state.calendar().stats(year, query.month)?;
    Ok(Json(report))
}

async fn get_days(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<MonthStates>, ApiError> {
    let today = state.today();
    let (year, month) = match (query.year, query.month) {
        (Some(year), Some(month)) => (year, month),
        _ => (today.year(), today.month()),
    };
    let states = state.calendar().month_states(year, month)?;
    Ok(Json(states))
}

async fn set_day(
    State(state): State<AppState>,
    Json(payload): Json<SetDayPayload>,
) -> Result<Json<DayUpdate>, ApiError> {
    let date = parse_iso_date(&payload.date)?;
    let new_state = payload
        .state
        .parse::<DayState>()
        .map_err(|err| ApiError::invalid(err.to_string()))?;
    let stored = state
        .calendar()
        .set_day_state(date, new_state, state.today())?;
    Ok(Json(DayUpdate {
        success: true,
        date,
        state: stored,
    }))
}

async fn cycle_day(
    State(state): State<AppState>,
    Json(payload): Json<CycleDayPayload>,
) -> Result<Json<DayUpdate>, ApiError> {
    let date = parse_iso_date(&payload.date)?;
    let stored = state.calendar().cycle_day_state(date, state.today())?;
    Ok(Json(DayUpdate {
        success: true,
        date,
        state: stored,
    }))
}

async fn get_editable(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Editability>, ApiError> {
    let date = parse_iso_date(&query.date)?;
    validate_year(date.year())?;
    let calendar = state.calendar();
    let check = calendar.check_editable(date, state.today());
    let blocked_by = calendar.engine().block_reason(date);
    Ok(Json(Editability {
        date,
        editable: check.is_ok(),
        blocked_by,
        month_locked: matches!(check, Err(EditRejection::MonthLocked)),
    }))
}
