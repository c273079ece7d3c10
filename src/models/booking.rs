use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::time::{ClockTime, TimeRange};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Short code the customer quotes when contacting the business.
    pub fn confirmation_code(&self) -> String {
        self.id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .take(6)
            .collect::<String>()
            .to_ascii_uppercase()
    }

    pub fn interval(&self) -> BookedInterval {
        BookedInterval {
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Admin transitions: pending -> confirmed, pending|confirmed -> cancelled.
    /// Nothing leaves `cancelled`.
    pub fn can_transition_to(self, target: BookingStatus) -> bool {
        matches!(
            (self, target),
            (BookingStatus::Pending, BookingStatus::Confirmed)
                | (BookingStatus::Pending, BookingStatus::Cancelled)
                | (BookingStatus::Confirmed, BookingStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status `{0}`, expected one of pending, confirmed, cancelled")]
pub struct ParseStatusError(String);

impl FromStr for BookingStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// The part of a booking the public availability endpoint may reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedInterval {
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl BookedInterval {
    pub fn range(&self) -> Option<TimeRange> {
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// Booking form as submitted by a customer. Every field is optional on the
/// wire so missing fields surface as validation errors instead of a JSON
/// rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub client_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("pending".parse(), Ok(BookingStatus::Pending));
        assert_eq!("confirmed".parse(), Ok(BookingStatus::Confirmed));
        assert_eq!("cancelled".parse(), Ok(BookingStatus::Cancelled));
        assert!("archived".parse::<BookingStatus>().is_err());
        assert!("Confirmed".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Confirmed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Cancelled.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_confirmation_code() {
        let now = Utc::now();
        let booking = Booking {
            id: "3f2a9c1e-0000-4000-8000-000000000000".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 16).unwrap(),
            start_time: "09:00".parse().unwrap(),
            end_time: "10:00".parse().unwrap(),
            customer_name: "Alice".to_string(),
            customer_email: "alice@example.com".to_string(),
            customer_phone: None,
            notes: None,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(booking.confirmation_code(), "3F2A9C");
    }

    #[test]
    fn test_request_accepts_partial_json() {
        let req: BookingRequest =
            serde_json::from_str(r#"{"customerName":"Bob","date":"2026-03-16"}"#).unwrap();
        assert_eq!(req.customer_name.as_deref(), Some("Bob"));
        assert!(req.customer_email.is_none());
    }
}
