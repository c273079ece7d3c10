pub mod admission;
pub mod availability;
pub mod calendar_view;
pub mod ics;
pub mod mail;
pub mod slots;
