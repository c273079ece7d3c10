pub mod availability;
pub mod booking;
pub mod schedule;
pub mod settings;
pub mod time;

pub use availability::{AvailabilitySnapshot, DataMode, Slot};
pub use booking::{BookedInterval, Booking, BookingRequest, BookingStatus};
pub use schedule::{DateOverride, WeeklySchedule};
pub use settings::Settings;
pub use time::{ClockTime, TimeRange};
