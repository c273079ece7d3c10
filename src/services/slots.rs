use crate::models::{ClockTime, Slot, TimeRange};

/// Lazily generated slots over one opening range.
///
/// A clone resumes from the same position. Calling [`generate_slots`] again
/// with the same inputs yields the same sequence from the start.
#[derive(Debug, Clone)]
pub struct Slots {
    cursor: u32,
    end: u32,
    duration: u32,
    step: u32,
}

impl Iterator for Slots {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        if self.duration == 0 {
            return None;
        }
        let slot_end = self.cursor.checked_add(self.duration)?;
        if slot_end > self.end {
            return None;
        }
        let start_time = ClockTime::from_minutes(self.cursor)?;
        let end_time = ClockTime::from_minutes(slot_end)?;
        // An overflowing step ends the sequence.
        self.cursor = self.cursor.checked_add(self.step).unwrap_or(u32::MAX);
        Some(Slot {
            start_time,
            end_time,
        })
    }
}

/// Slots of `slot_duration` minutes from the range start, each followed by
/// `buffer_time` idle minutes, never running past the range end.
pub fn generate_slots(range: Option<TimeRange>, slot_duration: u32, buffer_time: u32) -> Slots {
    match range {
        Some(range) => Slots {
            cursor: range.start.minutes(),
            end: range.end.minutes(),
            duration: slot_duration,
            step: slot_duration.saturating_add(buffer_time),
        },
        None => Slots {
            cursor: 0,
            end: 0,
            duration: 0,
            step: 0,
        },
    }
}
