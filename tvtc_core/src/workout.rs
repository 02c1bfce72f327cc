//! Workouts and the text heuristics recovering them from a day cell.
//!
//! A day cell renders as lines of text. Every workout takes ten of them:
//!
//! | line | content                  |
//! |------|--------------------------|
//! | 2    | title                    |
//! | 3    | first location line      |
//! | 5    | second location line     |
//! | 7    | third location line      |
//! | 9    | start time, `6:00 AM`    |
//!
//! The remaining lines are layout noise.

use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

pub const DURATION_MINUTES: i64 = 90;
pub const BLOCK_LINES: usize = 10;

/// Blocks are only consumed while one more line than a block remains.
const MIN_REMAINING_LINES: usize = BLOCK_LINES + 1;

const TITLE_LINE: usize = 2;
const LOCATION_LINES: [usize; 3] = [3, 5, 7];
const TIME_LINE: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workout {
    pub title: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// The fields of a single workout block, not yet tied to a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutBlock {
    pub title: String,
    pub location: String,
    pub time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedBlock {
    #[error("unexpected number of parts in time: `{0}`")]
    TimeParts(String),
    #[error("unable to parse time as hour and minute: `{0}`")]
    HourMinute(String),
    #[error("expected AM/PM and not: `{0}`")]
    Meridiem(String),
    #[error("time out of range: `{0}`")]
    OutOfRange(String),
    #[error("{time} does not exist on {date}")]
    NonexistentLocalTime { date: NaiveDate, time: NaiveTime },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl FromStr for Meridiem {
    type Err = MalformedBlock;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AM" => Ok(Meridiem::Am),
            "PM" => Ok(Meridiem::Pm),
            _ => Err(MalformedBlock::Meridiem(String::from(s))),
        }
    }
}

impl WorkoutBlock {
    /// Place the block on a day in the given zone.
    pub fn at(self, date: NaiveDate, tz: Tz) -> Result<Workout, MalformedBlock> {
        let start = local_to_utc(date.and_time(self.time), tz).ok_or(
            MalformedBlock::NonexistentLocalTime {
                date,
                time: self.time,
            },
        )?;
        Ok(Workout {
            title: self.title,
            location: self.location,
            start,
            end: start + Duration::minutes(DURATION_MINUTES),
        })
    }
}

/// Resolve a wall-clock time in `tz` to an instant.
///
/// Ambiguous times take the earlier instant. Times skipped by a forward transition are read with
/// the offset in force before it, which lands one hour later on the wall clock.
fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    let resolved = match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest(),
    };
    resolved.map(|dt| dt.with_timezone(&Utc))
}

/// Parse a 12-hour time of the form `<hour>:<minute> <AM|PM>`.
pub fn parse_time(value: &str) -> Result<NaiveTime, MalformedBlock> {
    let parts: Vec<&str> = value.trim().split(' ').collect();
    let [clock, meridiem] = parts[..] else {
        return Err(MalformedBlock::TimeParts(String::from(value)));
    };
    let hour_minute: Vec<&str> = clock.split(':').collect();
    let [hour, minute] = hour_minute[..] else {
        return Err(MalformedBlock::HourMinute(String::from(clock)));
    };
    let (Ok(hour), Ok(minute)) = (hour.parse::<u32>(), minute.parse::<u32>()) else {
        return Err(MalformedBlock::HourMinute(String::from(clock)));
    };
    let meridiem: Meridiem = meridiem.parse()?;
    if !(1..=12).contains(&hour) {
        return Err(MalformedBlock::OutOfRange(String::from(clock)));
    }
    let hour = match (meridiem, hour) {
        (Meridiem::Am, 12) => 0,
        (Meridiem::Am, hour) => hour,
        (Meridiem::Pm, 12) => 12,
        (Meridiem::Pm, hour) => hour + 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or_else(|| MalformedBlock::OutOfRange(String::from(clock)))
}

/// Extract the fields of one workout from its ten lines.
pub fn parse_block(lines: &[&str; BLOCK_LINES]) -> Result<WorkoutBlock, MalformedBlock> {
    let location = LOCATION_LINES
        .iter()
        .map(|&index| lines[index].trim())
        .collect::<Vec<&str>>()
        .join(", ");
    Ok(WorkoutBlock {
        title: String::from(lines[TITLE_LINE].trim()),
        location: String::from(location.trim()),
        time: parse_time(lines[TIME_LINE])?,
    })
}

/// Extract all workouts of a day cell.
///
/// A single malformed block discards the whole cell, including blocks parsed before it.
pub fn parse_day(text: &str, date: NaiveDate, tz: Tz) -> Result<Vec<Workout>, MalformedBlock> {
    let mut workouts = vec![];
    let all_lines: Vec<&str> = text.split('\n').collect();
    let mut lines = all_lines.as_slice();
    while lines.len() >= MIN_REMAINING_LINES {
        let (block, rest) = lines.split_at(BLOCK_LINES);
        if let Ok(block) = <&[&str; BLOCK_LINES]>::try_from(block) {
            workouts.push(parse_block(block)?.at(date, tz)?);
        }
        lines = rest;
    }
    Ok(workouts)
}
