use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::time::MINUTES_PER_DAY;

pub const DEFAULT_TIMEZONE: &str = "Pacific/Auckland";

/// Longest booking horizon a business may configure: one year.
pub const MAX_ADVANCE_BOOKING_HOURS: u32 = 365 * 24;

/// Business-wide booking rules. One row per business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Minutes per appointment.
    pub slot_duration: u32,
    /// Idle minutes between consecutive slots.
    pub buffer_time: u32,
    /// Hours from now before which a slot cannot be booked.
    pub min_advance_booking: u32,
    /// Hours from now after which a slot cannot be booked.
    pub max_advance_booking: u32,
    pub require_approval: bool,
    pub timezone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            slot_duration: 60,
            buffer_time: 15,
            min_advance_booking: 24,
            max_advance_booking: 2160,
            require_approval: false,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl Settings {
    pub fn tz(&self) -> Option<Tz> {
        self.timezone.parse().ok()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.slot_duration == 0 {
            return Err("slotDuration must be greater than zero".to_string());
        }
        if self.slot_duration >= MINUTES_PER_DAY {
            return Err("slotDuration must be shorter than a day".to_string());
        }
        if self.buffer_time >= MINUTES_PER_DAY {
            return Err("bufferTime must be shorter than a day".to_string());
        }
        if self.max_advance_booking > MAX_ADVANCE_BOOKING_HOURS {
            return Err(format!(
                "maxAdvanceBooking must be at most {MAX_ADVANCE_BOOKING_HOURS} hours"
            ));
        }
        if self.max_advance_booking < self.min_advance_booking {
            return Err(format!(
                "maxAdvanceBooking ({}) must not be less than minAdvanceBooking ({})",
                self.max_advance_booking, self.min_advance_booking
            ));
        }
        if self.tz().is_none() {
            return Err(format!("unknown timezone: {}", self.timezone));
        }
        Ok(())
    }
}
