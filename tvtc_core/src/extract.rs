//! Find the month and the workouts in the calendar page's main table.

use chrono::{Datelike, Days, NaiveDate};
use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::{
    workout::{self, Workout},
    Error, Result,
};

static CAPTION_SELECTOR: &str = "div#main > table > caption";
static ROW_SELECTOR: &str = "div#main > table > tbody > tr";

static MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// This is the data which can be extracted from the calendar page.
#[derive(Debug, PartialEq)]
pub struct ClubCalendar {
    pub year: i32,
    pub month: u32,
    pub workouts: Vec<Workout>,
}

fn text(element: ElementRef) -> String {
    element.text().collect()
}

/// The `td` children of a table row.
fn cells<'a>(row: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|element| element.value().name() == "td")
}

/// Extract the workouts shown on the page.
///
/// `today` decides the year, which the page does not show. All times are read in `tz`.
pub fn parse(document: &Html, today: NaiveDate, tz: Tz) -> Result<ClubCalendar> {
    let caption_selector = Selector::parse(CAPTION_SELECTOR).unwrap();
    let row_selector = Selector::parse(ROW_SELECTOR).unwrap();
    let caption = document
        .select(&caption_selector)
        .next()
        .ok_or(Error::MissingMonth)?;
    let month = parse_month(&text(caption))?;
    let year = resolve_year(month, today);
    let mut rows = document.select(&row_selector);
    let first_cell = rows
        .next()
        .and_then(|row| cells(row).next())
        .ok_or(Error::MissingDay)?;
    let mut cursor = start_date(year, month, parse_day_of_month(&text(first_cell))?)?;
    let mut workouts = vec![];
    // Rows alternate between day numbers and workouts, starting with day numbers.
    for row in rows.step_by(2) {
        workouts.extend(parse_workout_row(&mut cursor, row, tz));
    }
    Ok(ClubCalendar {
        year,
        month,
        workouts,
    })
}

/// Get the month from the caption of the main table, e.g. `June 2024 Calendar`.
pub fn parse_month(caption: &str) -> Result<u32> {
    let name = caption
        .trim()
        .split(' ')
        .next()
        .unwrap_or_default()
        .trim();
    MONTH_NAMES
        .iter()
        .position(|&month_name| month_name == name)
        .map(|index| index as u32 + 1)
        .ok_or_else(|| Error::InvalidMonth(String::from(name)))
}

/// The page only shows the month, so assume the current year unless a December calendar is still
/// shown in January.
pub fn resolve_year(month: u32, today: NaiveDate) -> i32 {
    if month == 12 && today.month() == 1 {
        today.year() - 1
    } else {
        today.year()
    }
}

/// Get the day number from the first cell of a day row, e.g. `Sun 2`.
pub fn parse_day_of_month(text: &str) -> Result<u32> {
    text.trim()
        .split(' ')
        .last()
        .and_then(|day| day.parse::<u32>().ok())
        .filter(|&day| day > 0)
        .ok_or_else(|| Error::InvalidDay(String::from(text)))
}

/// The date of the first cell. Days past the end of the month roll over into the next one.
fn start_date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_days(Days::new(u64::from(day - 1))))
        .ok_or_else(|| Error::InvalidDay(day.to_string()))
}

/// Extract the workouts of a row, one cell per day.
///
/// The cursor is advanced by one day per cell, whether the cell held workouts or not.
fn parse_workout_row(cursor: &mut NaiveDate, row: ElementRef, tz: Tz) -> Vec<Workout> {
    let mut workouts = vec![];
    for cell in cells(row) {
        match workout::parse_day(&text(cell), *cursor, tz) {
            Ok(day) => workouts.extend(day),
            Err(err) => warn!("skipping workouts on {cursor}: {err}"),
        }
        if let Some(next) = cursor.succ_opt() {
            *cursor = next;
        }
    }
    workouts
}
