use crate::models::{Booking, BookingStatus};

/// Escapes a TEXT value (RFC 5545 section 3.3.11).
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn ics_status(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "TENTATIVE",
        BookingStatus::Confirmed => "CONFIRMED",
        BookingStatus::Cancelled => "CANCELLED",
    }
}

/// Renders a single-event calendar for the booking. Start and end are the
/// booking's wall-clock times in the business timezone.
pub fn generate_ics(booking: &Booking, business_name: &str, timezone: &str) -> String {
    let day = booking.date.format("%Y%m%d");
    let dtstart = format!("{day}T{:02}{:02}00", booking.start_time.hour(), booking.start_time.minute());
    let dtend = format!("{day}T{:02}{:02}00", booking.end_time.hour(), booking.end_time.minute());
    let dtstamp = booking.created_at.format("%Y%m%dT%H%M%SZ");
    let uid = format!("{}@slotbook", booking.id);

    let summary = escape_text(&format!("Appointment with {business_name}"));
    let description = escape_text(booking.notes.as_deref().unwrap_or("No additional notes"));
    let status = ics_status(booking.status);

    format!(
        "BEGIN:VCALENDAR\r\n\
         VERSION:2.0\r\n\
         PRODID:-//Slotbook//Appointments//EN\r\n\
         CALSCALE:GREGORIAN\r\n\
         METHOD:PUBLISH\r\n\
         BEGIN:VEVENT\r\n\
         UID:{uid}\r\n\
         DTSTAMP:{dtstamp}\r\n\
         DTSTART;TZID={timezone}:{dtstart}\r\n\
         DTEND;TZID={timezone}:{dtend}\r\n\
         SUMMARY:{summary}\r\n\
         DESCRIPTION:{description}\r\n\
         STATUS:{status}\r\n\
         END:VEVENT\r\n\
         END:VCALENDAR\r\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};

    fn booking(notes: Option<&str>, status: BookingStatus) -> Booking {
        let created = DateTime::parse_from_rfc3339("2026-03-10T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Booking {
            id: "test-123".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            start_time: "14:00".parse().unwrap(),
            end_time: "15:00".parse().unwrap(),
            customer_name: "Alice".to_string(),
            customer_email: "alice@example.com".to_string(),
            customer_phone: None,
            notes: notes.map(str::to_string),
            status,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_generate_ics() {
        let ics = generate_ics(
            &booking(Some("Haircut"), BookingStatus::Confirmed),
            "Bob's Barbershop",
            "Pacific/Auckland",
        );
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.contains("DTSTART;TZID=Pacific/Auckland:20260316T140000\r\n"));
        assert!(ics.contains("DTEND;TZID=Pacific/Auckland:20260316T150000\r\n"));
        assert!(ics.contains("DTSTAMP:20260310T100000Z"));
        assert!(ics.contains("SUMMARY:Appointment with Bob's Barbershop"));
        assert!(ics.contains("DESCRIPTION:Haircut"));
        assert!(ics.contains("UID:test-123@slotbook"));
        assert!(ics.contains("STATUS:CONFIRMED"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_no_notes_and_pending() {
        let ics = generate_ics(&booking(None, BookingStatus::Pending), "Test Biz", "UTC");
        assert!(ics.contains("DESCRIPTION:No additional notes"));
        assert!(ics.contains("STATUS:TENTATIVE"));
    }

    #[test]
    fn test_text_is_escaped() {
        let ics = generate_ics(
            &booking(Some("cut, wash; style\nthanks"), BookingStatus::Confirmed),
            "Cuts, Inc",
            "UTC",
        );
        assert!(ics.contains("SUMMARY:Appointment with Cuts\\, Inc"));
        assert!(ics.contains("DESCRIPTION:cut\\, wash\\; style\\nthanks"));
    }
}
