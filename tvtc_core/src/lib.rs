//! This crate turns the Tri-Valley Triathlon Club's workout calendar into an iCalendar file.
//!
//! The workouts are read from <http://www.trivalleytriclub.com/calendar>.

pub use ical;

pub mod calendar;
pub mod club_client;
pub mod document;
pub mod error;
pub mod extract;
pub mod source;
pub mod workout;

pub use error::{Error, Result};
