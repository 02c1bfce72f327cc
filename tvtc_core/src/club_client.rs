//! This client fetches the club's calendar page and turns its workouts into an iCalendar.

use chrono::{Local, Utc};
use chrono_tz::Tz;
use ical::generator::IcalCalendar;
use tracing::info;

use crate::{
    calendar::get_calendar,
    document::normalize,
    extract::{self, ClubCalendar},
    source::{self, Source},
    Result,
};

/// All workouts take place in the club's home zone.
pub static TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

/// Get the calendar of the workouts currently shown on the calendar page.
pub async fn get(source: &Source) -> Result<IcalCalendar> {
    let club_calendar = get_workouts(source).await?;
    Ok(get_calendar(&club_calendar.workouts, Utc::now()))
}

/// Fetch and parse the calendar page.
pub async fn get_workouts(source: &Source) -> Result<ClubCalendar> {
    let raw = source::read(source).await?;
    let club_calendar = parse(&raw)?;
    info!(
        "parsed {} workouts for {}-{:02}",
        club_calendar.workouts.len(),
        club_calendar.year,
        club_calendar.month
    );
    Ok(club_calendar)
}

fn parse(raw: &[u8]) -> Result<ClubCalendar> {
    let document = normalize(raw)?;
    extract::parse(&document, Local::now().date_naive(), TIMEZONE)
}
