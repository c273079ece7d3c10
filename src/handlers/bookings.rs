use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::admin::check_auth;
use crate::models::{AvailabilitySnapshot, Booking, BookingRequest, BookingStatus, DataMode, Slot};
use crate::services::admission::{self, parse_date};
use crate::services::calendar_view::{self, first_of_month, DayCell, PeriodGroup};
use crate::services::availability;
use crate::state::AppState;

/// Default look-ahead of the public availability read.
const DEFAULT_RANGE_DAYS: i64 = 365;

/// Resolves the `clientId` every public endpoint carries against the one
/// business this instance serves.
fn require_client(state: &AppState, client_id: Option<&str>) -> Result<(), AppError> {
    match client_id.map(str::trim).filter(|c| !c.is_empty()) {
        None => Err(AppError::Validation("clientId is required".to_string())),
        Some(id) if id == state.config.client_id => Ok(()),
        Some(id) => Err(AppError::NotFound(format!("business {id}"))),
    }
}

fn parse_date_param(name: &str, value: &str) -> Result<NaiveDate, AppError> {
    parse_date(value).ok_or_else(|| AppError::Validation(format!("invalid {name} `{value}`, expected YYYY-MM-DD")))
}

// GET /api/bookings/availability
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub client_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    #[serde(flatten)]
    snapshot: AvailabilitySnapshot,
    mode: DataMode,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(q): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    require_client(&state, q.client_id.as_deref())?;

    let from = match q.start_date.as_deref() {
        Some(s) => parse_date_param("startDate", s)?,
        None => Utc::now().date_naive(),
    };
    let to = match q.end_date.as_deref() {
        Some(s) => parse_date_param("endDate", s)?,
        None => from + Duration::days(DEFAULT_RANGE_DAYS),
    };
    if to < from {
        return Err(AppError::Validation("endDate must not be before startDate".to_string()));
    }

    let snapshot = {
        let conn = state.conn()?;
        queries::load_snapshot(&conn, from, to)?
    };

    Ok(Json(AvailabilityResponse {
        snapshot,
        mode: state.mode,
    }))
}

// GET /api/bookings/slots
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsQuery {
    pub client_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    date: NaiveDate,
    available: Vec<Slot>,
    periods: Vec<PeriodGroup>,
    mode: DataMode,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Query(q): Query<SlotsQuery>,
) -> Result<Json<SlotsResponse>, AppError> {
    require_client(&state, q.client_id.as_deref())?;
    let raw = q
        .date
        .as_deref()
        .ok_or_else(|| AppError::Validation("date is required".to_string()))?;
    let date = parse_date_param("date", raw)?;

    let snapshot = {
        let conn = state.conn()?;
        queries::load_snapshot(&conn, date, date)?
    };
    let now = Utc::now();

    Ok(Json(SlotsResponse {
        date,
        available: availability::available_slots(&snapshot, date, now),
        periods: calendar_view::day_view(&snapshot, date, now),
        mode: state.mode,
    }))
}

// GET /api/bookings/calendar
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarQuery {
    pub client_id: Option<String>,
    /// `YYYY-MM`, defaults to the current month.
    pub month: Option<String>,
}

#[derive(Serialize)]
pub struct CalendarResponse {
    month: String,
    days: Vec<DayCell>,
    mode: DataMode,
}

pub async fn get_calendar(
    State(state): State<Arc<AppState>>,
    Query(q): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    require_client(&state, q.client_id.as_deref())?;
    let now = Utc::now();

    let first = match q.month.as_deref() {
        Some(m) => NaiveDate::parse_from_str(&format!("{}-01", m.trim()), "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("invalid month `{m}`, expected YYYY-MM")))?,
        None => first_of_month(now.date_naive()),
    };
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);

    let snapshot = {
        let conn = state.conn()?;
        queries::load_snapshot(&conn, first, last)?
    };

    Ok(Json(CalendarResponse {
        month: format!("{:04}-{:02}", first.year(), first.month()),
        days: calendar_view::month_view(&snapshot, first, now),
        mode: state.mode,
    }))
}

// POST /api/bookings
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    id: String,
    confirmation_code: String,
    booking: Booking,
    mode: DataMode,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    require_client(&state, req.client_id.as_deref())?;

    let booking = {
        let mut conn = state.conn()?;
        admission::submit_booking(&mut conn, &req, Utc::now())?
    };

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id: booking.id.clone(),
            confirmation_code: booking.confirmation_code(),
            booking,
            mode: state.mode,
        }),
    ))
}

// PATCH /api/bookings/:id
#[derive(Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Booking>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let target: BookingStatus = body
        .status
        .parse()
        .map_err(|e| AppError::Validation(format!("{e}")))?;
    state.ensure_writable()?;

    let booking = {
        let mut conn = state.conn()?;
        admission::transition_status(&mut conn, &id, target)?
    };

    Ok(Json(booking))
}
