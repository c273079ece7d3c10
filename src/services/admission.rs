use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, ErrorCode, TransactionBehavior};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingRequest, BookingStatus, ClockTime};
use crate::services::availability;

/// A booking request that passed field validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD`, or an ISO timestamp whose date part is used as-is.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let date_part = s.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn validate_request(req: &BookingRequest) -> Result<ValidatedRequest, AppError> {
    let name = present(&req.customer_name);
    let email = present(&req.customer_email);
    let date = present(&req.date);
    let start = present(&req.start_time);
    let end = present(&req.end_time);

    let missing: Vec<&str> = [
        ("customerName", name.is_none()),
        ("customerEmail", email.is_none()),
        ("date", date.is_none()),
        ("startTime", start.is_none()),
        ("endTime", end.is_none()),
    ]
    .into_iter()
    .filter_map(|(field, absent)| absent.then_some(field))
    .collect();

    let (Some(name), Some(email), Some(date), Some(start), Some(end)) = (name, email, date, start, end)
    else {
        return Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };

    if !is_plausible_email(email) {
        return Err(AppError::Validation(format!("invalid customerEmail: {email}")));
    }
    let date = parse_date(date)
        .ok_or_else(|| AppError::Validation(format!("invalid date `{date}`, expected YYYY-MM-DD")))?;
    let start_time: ClockTime = start
        .parse()
        .map_err(|e| AppError::Validation(format!("startTime: {e}")))?;
    let end_time: ClockTime = end
        .parse()
        .map_err(|e| AppError::Validation(format!("endTime: {e}")))?;
    if start_time >= end_time {
        return Err(AppError::Validation(format!(
            "startTime {start_time} must be before endTime {end_time}"
        )));
    }

    Ok(ValidatedRequest {
        date,
        start_time,
        end_time,
        customer_name: name.to_string(),
        customer_email: email.to_string(),
        customer_phone: present(&req.customer_phone).map(str::to_string),
        notes: present(&req.notes).map(str::to_string),
    })
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(' ')
        }
        None => false,
    }
}

/// Admits a booking against the current contents of the store.
///
/// The availability re-check and the insert run inside one IMMEDIATE
/// transaction, so competing writers queue on the database write lock. The
/// partial unique index on live `(date, start_time)` rows is the last line:
/// a constraint failure on insert is reported as `SlotTaken`.
pub fn submit_booking(
    conn: &mut Connection,
    req: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<Booking, AppError> {
    let valid = validate_request(req)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let snapshot = queries::load_snapshot(&tx, valid.date, valid.date)?;

    if !availability::is_bookable(&snapshot, valid.date, valid.start_time, valid.end_time, now) {
        tracing::info!(
            date = %valid.date,
            start = %valid.start_time,
            end = %valid.end_time,
            "requested slot is not available"
        );
        return Err(AppError::SlotTaken);
    }

    let require_approval = snapshot
        .settings
        .as_ref()
        .map(|s| s.require_approval)
        .unwrap_or(true);
    let status = if require_approval {
        BookingStatus::Pending
    } else {
        BookingStatus::Confirmed
    };

    let booking = Booking {
        id: uuid::Uuid::new_v4().to_string(),
        date: valid.date,
        start_time: valid.start_time,
        end_time: valid.end_time,
        customer_name: valid.customer_name,
        customer_email: valid.customer_email,
        customer_phone: valid.customer_phone,
        notes: valid.notes,
        status,
        created_at: now,
        updated_at: now,
    };

    match queries::insert_booking(&tx, &booking) {
        Ok(()) => {}
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            tracing::warn!(date = %booking.date, start = %booking.start_time, "slot claimed concurrently");
            return Err(AppError::SlotTaken);
        }
        Err(e) => return Err(e.into()),
    }
    tx.commit()?;

    tracing::info!(
        booking_id = %booking.id,
        date = %booking.date,
        start = %booking.start_time,
        status = booking.status.as_str(),
        "booking admitted"
    );

    Ok(booking)
}

/// Applies an admin status change, enforcing the booking lifecycle.
pub fn transition_status(
    conn: &mut Connection,
    id: &str,
    target: BookingStatus,
) -> Result<Booking, AppError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current = queries::get_booking_by_id(&tx, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if !current.status.can_transition_to(target) {
        return Err(AppError::Validation(format!(
            "cannot change booking from {} to {}",
            current.status.as_str(),
            target.as_str()
        )));
    }

    if !queries::update_booking_status(&tx, id, current.status, target)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    let updated = queries::get_booking_by_id(&tx, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;
    tx.commit()?;

    tracing::info!(
        booking_id = %id,
        from = current.status.as_str(),
        to = target.as_str(),
        "booking status changed"
    );

    Ok(updated)
}
