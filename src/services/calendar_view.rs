use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{AvailabilitySnapshot, ClockTime, DataMode, Slot};
use crate::services::availability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Morning,
    Afternoon,
    Evening,
}

impl Period {
    pub fn of(time: ClockTime) -> Self {
        match time.hour() {
            h if h < 12 => Period::Morning,
            h if h < 17 => Period::Afternoon,
            _ => Period::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Morning => "Morning",
            Period::Afternoon => "Afternoon",
            Period::Evening => "Evening",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodGroup {
    pub period: Period,
    pub label: &'static str,
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DayStatus {
    /// No opening hours: weekly day off or a closed override.
    Closed,
    /// Open but outside the advance-booking window.
    Unavailable,
    FullyBooked,
    Available,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCell {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub available_slots: usize,
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The calendar date `now` falls on in the business timezone, UTC when unknown.
pub fn business_today(snapshot: &AvailabilitySnapshot, now: DateTime<Utc>) -> NaiveDate {
    match snapshot.settings.as_ref().and_then(|s| s.tz()) {
        Some(tz) => now.with_timezone(&tz).date_naive(),
        None => now.date_naive(),
    }
}

pub fn day_cell(snapshot: &AvailabilitySnapshot, date: NaiveDate, now: DateTime<Utc>) -> DayCell {
    let candidates = availability::all_slots(snapshot, date);
    let in_window = availability::slots_in_window(snapshot, date, now);
    let available = availability::available_slots(snapshot, date, now).len();

    // Fully booked only when bookings, not the window, took the last slot.
    let status = if candidates.is_empty() {
        DayStatus::Closed
    } else if available > 0 {
        DayStatus::Available
    } else if !in_window.is_empty() {
        DayStatus::FullyBooked
    } else {
        DayStatus::Unavailable
    };

    DayCell {
        date,
        status,
        available_slots: available,
    }
}

/// One cell per day of the month containing `month`.
pub fn month_view(
    snapshot: &AvailabilitySnapshot,
    month: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<DayCell> {
    let first = first_of_month(month);
    first
        .iter_days()
        .take_while(|d| d.month() == first.month())
        .map(|d| day_cell(snapshot, d, now))
        .collect()
}

/// Candidate slots of `date` grouped by time of day. Slots that cannot be
/// booked (taken or outside the window) are kept and marked unavailable.
/// Empty periods are omitted.
pub fn day_view(snapshot: &AvailabilitySnapshot, date: NaiveDate, now: DateTime<Utc>) -> Vec<PeriodGroup> {
    let open = availability::available_slots(snapshot, date, now);
    let mut groups: Vec<PeriodGroup> = Vec::new();

    for slot in availability::all_slots(snapshot, date) {
        let view = SlotView {
            start_time: slot.start_time,
            end_time: slot.end_time,
            available: open.contains(&slot),
        };
        let period = Period::of(slot.start_time);
        match groups.iter_mut().find(|g| g.period == period) {
            Some(group) => group.slots.push(view),
            None => groups.push(PeriodGroup {
                period,
                label: period.label(),
                slots: vec![view],
            }),
        }
    }

    groups
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Booked { confirmation_code: String },
    SlotTaken,
}

/// State of the public booking calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarState {
    /// First day of the visible month.
    pub month: NaiveDate,
    pub selected_date: Option<NaiveDate>,
    pub selected_slot: Option<Slot>,
    pub snapshot: Option<AvailabilitySnapshot>,
    pub mode: Option<DataMode>,
    /// Set after a submission; cleared once fresh data is loaded.
    pub needs_refresh: bool,
    pub notice: Option<Notice>,
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: first_of_month(today),
            selected_date: None,
            selected_slot: None,
            snapshot: None,
            mode: None,
            needs_refresh: true,
            notice: None,
        }
    }

    fn cleared(&self) -> Self {
        Self {
            selected_date: None,
            selected_slot: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CalendarAction {
    Loaded {
        snapshot: AvailabilitySnapshot,
        mode: DataMode,
    },
    PrevMonth,
    NextMonth,
    SelectDate(NaiveDate),
    SelectSlot(Slot),
    BookingSucceeded { confirmation_code: String },
    SlotTaken,
    ClearSelection,
}

pub fn reduce(state: &CalendarState, action: CalendarAction, now: DateTime<Utc>) -> CalendarState {
    match action {
        CalendarAction::Loaded { snapshot, mode } => {
            let mut next = CalendarState {
                snapshot: Some(snapshot),
                mode: Some(mode),
                needs_refresh: false,
                ..state.clone()
            };
            // A reload can invalidate the selection.
            if let (Some(snap), Some(date)) = (next.snapshot.as_ref(), next.selected_date) {
                let open = availability::available_slots(snap, date, now);
                if open.is_empty() {
                    next.selected_date = None;
                    next.selected_slot = None;
                } else if next.selected_slot.is_some_and(|s| !open.contains(&s)) {
                    next.selected_slot = None;
                }
            }
            next
        }
        CalendarAction::PrevMonth => {
            let today = state
                .snapshot
                .as_ref()
                .map(|s| business_today(s, now))
                .unwrap_or_else(|| now.date_naive());
            match state.month.checked_sub_months(Months::new(1)) {
                Some(prev) if prev >= first_of_month(today) => CalendarState {
                    month: prev,
                    notice: None,
                    ..state.cleared()
                },
                _ => state.clone(),
            }
        }
        CalendarAction::NextMonth => {
            let horizon = state
                .snapshot
                .as_ref()
                .and_then(|s| s.settings.as_ref())
                .map(|s| match availability::advance_window(s, now) {
                    Some((_, latest)) => latest.date_naive(),
                    None => now.date_naive(),
                });
            match state.month.checked_add_months(Months::new(1)) {
                Some(next) if horizon.map_or(true, |h| next <= h) => CalendarState {
                    month: next,
                    notice: None,
                    ..state.cleared()
                },
                _ => state.clone(),
            }
        }
        CalendarAction::SelectDate(date) => {
            let Some(snap) = state.snapshot.as_ref() else {
                return state.clone();
            };
            if availability::available_slots(snap, date, now).is_empty() {
                return state.clone();
            }
            CalendarState {
                month: first_of_month(date),
                selected_date: Some(date),
                selected_slot: None,
                notice: None,
                ..state.clone()
            }
        }
        CalendarAction::SelectSlot(slot) => {
            let (Some(snap), Some(date)) = (state.snapshot.as_ref(), state.selected_date) else {
                return state.clone();
            };
            if !availability::is_bookable(snap, date, slot.start_time, slot.end_time, now) {
                return state.clone();
            }
            CalendarState {
                selected_slot: Some(slot),
                ..state.clone()
            }
        }
        CalendarAction::BookingSucceeded { confirmation_code } => CalendarState {
            needs_refresh: true,
            notice: Some(Notice::Booked { confirmation_code }),
            ..state.cleared()
        },
        CalendarAction::SlotTaken => CalendarState {
            selected_slot: None,
            needs_refresh: true,
            notice: Some(Notice::SlotTaken),
            ..state.clone()
        },
        CalendarAction::ClearSelection => CalendarState {
            notice: None,
            ..state.cleared()
        },
    }
}
