use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::{
    AvailabilitySnapshot, BookedInterval, Booking, BookingStatus, DateOverride, Settings,
    WeeklySchedule,
};

// ── Settings ──

pub fn get_settings(conn: &Connection) -> rusqlite::Result<Option<Settings>> {
    conn.query_row(
        "SELECT slot_duration, buffer_time, min_advance_booking, max_advance_booking, require_approval, timezone
         FROM settings WHERE id = 1",
        [],
        |row| {
            Ok(Settings {
                slot_duration: row.get(0)?,
                buffer_time: row.get(1)?,
                min_advance_booking: row.get(2)?,
                max_advance_booking: row.get(3)?,
                require_approval: row.get(4)?,
                timezone: row.get(5)?,
            })
        },
    )
    .optional()
}

pub fn save_settings(conn: &Connection, settings: &Settings) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO settings (id, slot_duration, buffer_time, min_advance_booking, max_advance_booking, require_approval, timezone)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(id) DO UPDATE SET
           slot_duration = excluded.slot_duration,
           buffer_time = excluded.buffer_time,
           min_advance_booking = excluded.min_advance_booking,
           max_advance_booking = excluded.max_advance_booking,
           require_approval = excluded.require_approval,
           timezone = excluded.timezone,
           updated_at = datetime('now')",
        params![
            settings.slot_duration,
            settings.buffer_time,
            settings.min_advance_booking,
            settings.max_advance_booking,
            settings.require_approval,
            settings.timezone,
        ],
    )?;
    Ok(())
}

// ── Weekly schedule ──

pub fn get_schedules(conn: &Connection) -> rusqlite::Result<Vec<WeeklySchedule>> {
    let mut stmt = conn.prepare(
        "SELECT day_of_week, start_time, end_time, is_enabled FROM schedules ORDER BY day_of_week ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(WeeklySchedule {
            day_of_week: row.get(0)?,
            start_time: row.get(1)?,
            end_time: row.get(2)?,
            is_enabled: row.get(3)?,
        })
    })?;
    rows.collect()
}

/// Swaps the whole weekly schedule for `schedules` in one transaction.
pub fn replace_schedules(conn: &mut Connection, schedules: &[WeeklySchedule]) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM schedules", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO schedules (day_of_week, start_time, end_time, is_enabled) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for s in schedules {
            stmt.execute(params![s.day_of_week, s.start_time, s.end_time, s.is_enabled])?;
        }
    }
    tx.commit()
}

// ── Date overrides ──

pub fn get_overrides(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> rusqlite::Result<Vec<DateOverride>> {
    let mut stmt = conn.prepare(
        "SELECT date, is_available, start_time, end_time FROM overrides
         WHERE date BETWEEN ?1 AND ?2 ORDER BY date ASC",
    )?;
    let rows = stmt.query_map(params![from, to], parse_override_row)?;
    rows.collect()
}

pub fn upsert_override(conn: &Connection, o: &DateOverride) -> rusqlite::Result<()> {
    // Hours are meaningless on a closed day; store them as NULL.
    let (start, end) = if o.is_available {
        (o.start_time, o.end_time)
    } else {
        (None, None)
    };
    conn.execute(
        "INSERT INTO overrides (date, is_available, start_time, end_time) VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(date) DO UPDATE SET
           is_available = excluded.is_available,
           start_time = excluded.start_time,
           end_time = excluded.end_time",
        params![o.date, o.is_available, start, end],
    )?;
    Ok(())
}

pub fn delete_override(conn: &Connection, date: NaiveDate) -> rusqlite::Result<bool> {
    let count = conn.execute("DELETE FROM overrides WHERE date = ?1", params![date])?;
    Ok(count > 0)
}

fn parse_override_row(row: &Row) -> rusqlite::Result<DateOverride> {
    Ok(DateOverride {
        date: row.get(0)?,
        is_available: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
    })
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, date, start_time, end_time, customer_name, customer_email, customer_phone, notes, status, created_at, updated_at";

pub fn insert_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, date, start_time, end_time, customer_name, customer_email, customer_phone, notes, status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.date,
            booking.start_time,
            booking.end_time,
            booking.customer_name,
            booking.customer_email,
            booking.customer_phone,
            booking.notes,
            booking.status.as_str(),
            booking.created_at,
            booking.updated_at,
        ],
    )?;
    Ok(())
}

pub fn get_booking_by_id(conn: &Connection, id: &str) -> rusqlite::Result<Option<Booking>> {
    conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        parse_booking_row,
    )
    .optional()
}

/// Most recent dates first, optionally restricted to one status.
pub fn list_bookings(
    conn: &Connection,
    status: Option<BookingStatus>,
    limit: i64,
) -> rusqlite::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE (?1 IS NULL OR status = ?1)
         ORDER BY date DESC, start_time DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![status.map(|s| s.as_str()), limit], parse_booking_row)?;
    rows.collect()
}

/// Non-cancelled bookings in `[from, to]`, stripped of customer details.
pub fn get_booked_intervals(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> rusqlite::Result<Vec<BookedInterval>> {
    let mut stmt = conn.prepare(
        "SELECT date, start_time, end_time FROM bookings
         WHERE date BETWEEN ?1 AND ?2 AND status != 'cancelled'
         ORDER BY date ASC, start_time ASC",
    )?;
    let rows = stmt.query_map(params![from, to], |row| {
        Ok(BookedInterval {
            date: row.get(0)?,
            start_time: row.get(1)?,
            end_time: row.get(2)?,
        })
    })?;
    rows.collect()
}

/// Moves a booking from `from` to `to`. Returns false when the row is gone
/// or its status changed underneath us.
pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    from: BookingStatus,
    to: BookingStatus,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
        params![to.as_str(), Utc::now(), id, from.as_str()],
    )?;
    Ok(count > 0)
}

fn parse_booking_row(row: &Row) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(8)?;
    let status = status_str.parse::<BookingStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Booking {
        id: row.get(0)?,
        date: row.get(1)?,
        start_time: row.get(2)?,
        end_time: row.get(3)?,
        customer_name: row.get(4)?,
        customer_email: row.get(5)?,
        customer_phone: row.get(6)?,
        notes: row.get(7)?,
        status,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

// ── Snapshots ──

/// Everything the resolver needs for dates in `[from, to]`.
pub fn load_snapshot(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
) -> rusqlite::Result<AvailabilitySnapshot> {
    Ok(AvailabilitySnapshot {
        settings: get_settings(conn)?,
        schedules: get_schedules(conn)?,
        overrides: get_overrides(conn, from, to)?,
        bookings: get_booked_intervals(conn, from, to)?,
    })
}
