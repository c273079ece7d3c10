use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::settings::DEFAULT_TIMEZONE;
use crate::services::ics::generate_ics;
use crate::state::AppState;

// GET /calendar/:booking_id
pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let booking_id = raw_id.strip_suffix(".ics").unwrap_or(&raw_id);

    let (booking, timezone) = {
        let conn = state.conn()?;
        let booking = queries::get_booking_by_id(&conn, booking_id)?
            .ok_or_else(|| AppError::NotFound(format!("booking {booking_id}")))?;
        let timezone = queries::get_settings(&conn)?
            .map(|s| s.timezone)
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
        (booking, timezone)
    };

    let ics = generate_ics(&booking, &state.config.business_name, &timezone);
    let disposition = format!("attachment; filename=\"booking-{booking_id}.ics\"");

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ics,
    )
        .into_response())
}
