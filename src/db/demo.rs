use chrono::{Duration, NaiveDate, Utc};
use rusqlite::Connection;

use crate::db::queries;
use crate::models::{Booking, BookingStatus, ClockTime};

pub const DEMO_EMAIL_DOMAIN: &str = "demo.invalid";

/// Synthetic afternoon bookings every third day for the next month, so the
/// demo calendar shows taken slots. Addresses use a reserved domain so the
/// rows can never be mistaken for customers.
pub fn seed(conn: &Connection, today: NaiveDate) -> rusqlite::Result<usize> {
    let (Some(start), Some(end)) = (ClockTime::from_hm(14, 0), ClockTime::from_hm(15, 0)) else {
        return Ok(0);
    };
    let now = Utc::now();
    let mut created = 0;

    for offset in (2..32).step_by(3) {
        let date = today + Duration::days(offset);
        let booking = Booking {
            id: format!("demo-{}", date.format("%Y%m%d")),
            date,
            start_time: start,
            end_time: end,
            customer_name: "Demo Customer".to_string(),
            customer_email: format!("customer@{DEMO_EMAIL_DOMAIN}"),
            customer_phone: None,
            notes: Some("synthetic demo booking".to_string()),
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        };
        queries::insert_booking(conn, &booking)?;
        created += 1;
    }

    tracing::info!(bookings = created, "seeded demo dataset");
    Ok(created)
}
