use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::booking::BookedInterval;
use super::schedule::{day_of_week, DateOverride, WeeklySchedule};
use super::settings::Settings;
use super::time::{ClockTime, TimeRange};

/// A candidate bookable interval on some date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

impl Slot {
    pub fn range(&self) -> TimeRange {
        TimeRange {
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// Where the data behind a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataMode {
    Database,
    /// Synthetic data served while the real store is unreachable.
    Demo,
}

impl DataMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataMode::Database => "database",
            DataMode::Demo => "demo",
        }
    }
}

/// Immutable view of everything availability depends on, fetched once per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySnapshot {
    pub settings: Option<Settings>,
    pub schedules: Vec<WeeklySchedule>,
    pub overrides: Vec<DateOverride>,
    /// Non-cancelled bookings only.
    pub bookings: Vec<BookedInterval>,
}

impl AvailabilitySnapshot {
    pub fn override_for(&self, date: NaiveDate) -> Option<&DateOverride> {
        self.overrides.iter().find(|o| o.date == date)
    }

    pub fn schedule_for(&self, date: NaiveDate) -> Option<&WeeklySchedule> {
        let dow = day_of_week(date);
        self.schedules
            .iter()
            .find(|s| s.day_of_week == dow && s.is_enabled)
    }

    pub fn bookings_on(&self, date: NaiveDate) -> impl Iterator<Item = &BookedInterval> {
        self.bookings.iter().filter(move |b| b.date == date)
    }

    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.override_for(date).is_some_and(|o| !o.is_available)
    }

    /// Opening hours for the date: an open override wins, otherwise the
    /// enabled weekly row. A closed override or a non-working day gives `None`.
    pub fn effective_range(&self, date: NaiveDate) -> Option<TimeRange> {
        match self.override_for(date) {
            Some(o) => o.effective_range(),
            None => self.schedule_for(date).and_then(WeeklySchedule::range),
        }
    }
}
