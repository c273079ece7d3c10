use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::schedule::validate_schedules;
use crate::models::{Booking, BookingStatus, DateOverride, Settings, WeeklySchedule};
use crate::services::admission::parse_date;
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 1000;

pub(crate) fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if expected_token.is_empty() || token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

// GET /api/admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let status = match q.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
        Some(s) => Some(
            s.parse::<BookingStatus>()
                .map_err(|e| AppError::Validation(e.to_string()))?,
        ),
        None => None,
    };
    let limit = q.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);

    let conn = state.conn()?;
    Ok(Json(queries::list_bookings(&conn, status, limit)?))
}

// GET /api/admin/schedules
pub async fn get_schedules(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<WeeklySchedule>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let conn = state.conn()?;
    Ok(Json(queries::get_schedules(&conn)?))
}

// PUT /api/admin/schedules
pub async fn replace_schedules(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(schedules): Json<Vec<WeeklySchedule>>,
) -> Result<Json<Vec<WeeklySchedule>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    validate_schedules(&schedules).map_err(AppError::Validation)?;
    state.ensure_writable()?;

    let mut conn = state.conn()?;
    queries::replace_schedules(&mut conn, &schedules)?;
    tracing::info!(rows = schedules.len(), "weekly schedule replaced");
    Ok(Json(queries::get_schedules(&conn)?))
}

// GET /api/admin/overrides
#[derive(Deserialize)]
pub struct OverridesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

pub async fn get_overrides(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(q): Query<OverridesQuery>,
) -> Result<Json<Vec<DateOverride>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let date = |name: &str, v: &str| {
        parse_date(v).ok_or_else(|| AppError::Validation(format!("invalid {name} `{v}`")))
    };
    let from = match q.from.as_deref() {
        Some(v) => date("from", v)?,
        None => Utc::now().date_naive(),
    };
    let to = match q.to.as_deref() {
        Some(v) => date("to", v)?,
        None => from + Duration::days(365),
    };

    let conn = state.conn()?;
    Ok(Json(queries::get_overrides(&conn, from, to)?))
}

// POST /api/admin/overrides
pub async fn upsert_override(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(o): Json<DateOverride>,
) -> Result<Json<DateOverride>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    o.validate().map_err(AppError::Validation)?;
    state.ensure_writable()?;

    let conn = state.conn()?;
    queries::upsert_override(&conn, &o)?;
    tracing::info!(date = %o.date, available = o.is_available, "date override saved");
    Ok(Json(o))
}

// DELETE /api/admin/overrides/:date
pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw): Path<String>,
) -> Result<StatusCode, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let date = parse_date(&raw).ok_or_else(|| AppError::Validation(format!("invalid date `{raw}`")))?;
    state.ensure_writable()?;

    let conn = state.conn()?;
    if !queries::delete_override(&conn, date)? {
        return Err(AppError::NotFound(format!("override for {date}")));
    }
    tracing::info!(date = %date, "date override removed");
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/admin/settings
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Settings>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    let conn = state.conn()?;
    queries::get_settings(&conn)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("settings".to_string()))
}

// PUT /api/admin/settings
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;
    settings.validate().map_err(AppError::Validation)?;
    state.ensure_writable()?;

    let conn = state.conn()?;
    queries::save_settings(&conn, &settings)?;
    tracing::info!(
        slot_duration = settings.slot_duration,
        timezone = %settings.timezone,
        "settings updated"
    );
    Ok(Json(settings))
}
