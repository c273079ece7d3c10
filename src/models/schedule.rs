use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::time::{ClockTime, TimeRange};

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Recurring opening hours for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySchedule {
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u8,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub is_enabled: bool,
}

impl WeeklySchedule {
    pub fn range(&self) -> Option<TimeRange> {
        TimeRange::new(self.start_time, self.end_time)
    }

    pub fn day_name(&self) -> &'static str {
        DAY_NAMES
            .get(self.day_of_week as usize)
            .copied()
            .unwrap_or("Unknown")
    }
}

/// Weekday index of a calendar date, 0 = Sunday.
///
/// A civil date has the same weekday everywhere, so this never consults a
/// timezone.
pub fn day_of_week(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Checks a full replacement set of weekly rows.
pub fn validate_schedules(schedules: &[WeeklySchedule]) -> Result<(), String> {
    let mut seen = [false; 7];
    for s in schedules {
        if s.day_of_week > 6 {
            return Err(format!("dayOfWeek must be 0-6, got {}", s.day_of_week));
        }
        if seen[s.day_of_week as usize] {
            return Err(format!("duplicate schedule for {}", s.day_name()));
        }
        seen[s.day_of_week as usize] = true;
        if s.range().is_none() {
            return Err(format!(
                "{}: startTime {} must be before endTime {}",
                s.day_name(),
                s.start_time,
                s.end_time
            ));
        }
    }
    Ok(())
}

/// One-off exception to the weekly schedule for a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateOverride {
    pub date: NaiveDate,
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
}

impl DateOverride {
    pub fn closed(date: NaiveDate) -> Self {
        Self {
            date,
            is_available: false,
            start_time: None,
            end_time: None,
        }
    }

    pub fn custom_hours(date: NaiveDate, start: ClockTime, end: ClockTime) -> Self {
        Self {
            date,
            is_available: true,
            start_time: Some(start),
            end_time: Some(end),
        }
    }

    /// Custom hours, only when the override opens the day with a well-formed range.
    pub fn effective_range(&self) -> Option<TimeRange> {
        if !self.is_available {
            return None;
        }
        TimeRange::new(self.start_time?, self.end_time?)
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.is_available {
            return Ok(());
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if start < end => Ok(()),
            (Some(start), Some(end)) => Err(format!(
                "startTime {start} must be before endTime {end}"
            )),
            _ => Err("startTime and endTime are required when isAvailable is true".to_string()),
        }
    }
}
