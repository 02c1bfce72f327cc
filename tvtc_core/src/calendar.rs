//! Render workouts as an iCalendar file.

use std::{fs::write, path::Path};

use chrono::{DateTime, Utc};
use ical::{
    generator::{Emitter, IcalCalendar, IcalCalendarBuilder, IcalEvent, Property},
    ical_property,
};

use crate::{workout::Workout, Error, Result};

static PROD_ID: &str = "-//Tri-Valley Triathlon Club//trivalleytriclub.com//";
static UID_DOMAIN: &str = "trivalleytriclub.com";
/// Date-time in UTC, see RFC 5545 section 3.3.5.
static FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Build the calendar from the workouts, stamped with `stamp`.
pub fn get_calendar(workouts: &[Workout], stamp: DateTime<Utc>) -> IcalCalendar {
    let stamp = stamp.format(FORMAT).to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(PROD_ID)
        .build();
    calendar
        .properties
        .push(ical_property!("METHOD", "PUBLISH"));
    for workout in workouts {
        calendar.events.push(get_event(workout, &stamp));
    }
    calendar
}

/// Build the event of a single workout.
fn get_event(workout: &Workout, stamp: &str) -> IcalEvent {
    let start = workout.start.format(FORMAT).to_string();
    let end = workout.end.format(FORMAT).to_string();
    let mut event = IcalEvent::new();
    event.properties = vec![
        ical_property!("TRANSP", "TRANSPARENT"),
        ical_property!("DTSTART", &start),
        ical_property!("DTEND", &end),
        ical_property!("SUMMARY", &workout.title),
        ical_property!("LOCATION", &workout.location),
        ical_property!("UID", uid(&start, &end)),
        ical_property!("SEQUENCE", "0"),
        ical_property!("DTSTAMP", stamp),
    ];
    event
}

/// Get a unique id for a workout.
///
/// Changing this function is a breaking change!
fn uid(start: &str, end: &str) -> String {
    format!("{start}-{end}@{UID_DOMAIN}")
}

/// Write the calendar to `path`, replacing any existing file.
pub fn write_calendar(path: &Path, calendar: &IcalCalendar) -> Result<()> {
    write(path, calendar.generate()).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor};

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use ical::{
        generator::{Emitter, IcalCalendar},
        IcalParser,
    };

    use crate::{
        calendar::{get_calendar, write_calendar},
        workout::Workout,
        Error,
    };

    fn workout(title: &str, location: &str, start: DateTime<Utc>) -> Workout {
        Workout {
            title: String::from(title),
            location: String::from(location),
            start,
            end: start + Duration::minutes(90),
        }
    }

    fn get_test_workouts() -> Vec<Workout> {
        vec![
            workout(
                "Swim Practice",
                "Shannon Center, 11600 Shannon Ave, Dublin CA",
                Utc.with_ymd_and_hms(2024, 6, 2, 13, 0, 0).unwrap(),
            ),
            workout(
                "Track Workout",
                "Foothill High School, 4375 Foothill Rd, Pleasanton CA",
                Utc.with_ymd_and_hms(2024, 6, 4, 1, 30, 0).unwrap(),
            ),
        ]
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 15, 30).unwrap()
    }

    /// Read the generated calendar back in.
    fn reparse(calendar: &IcalCalendar) -> ical::parser::ical::component::IcalCalendar {
        let generated = calendar.generate();
        IcalParser::new(BufReader::new(Cursor::new(generated)))
            .next()
            .unwrap()
            .unwrap()
    }

    fn property_values(
        calendar: &ical::parser::ical::component::IcalCalendar,
        property_name: &str,
    ) -> Vec<String> {
        calendar
            .events
            .iter()
            .filter_map(|event| {
                event
                    .properties
                    .iter()
                    .find(|property| property.name == property_name)
                    .and_then(|property| property.value.clone())
            })
            // Commas in text values may come back escaped.
            .map(|value| value.replace("\\,", ","))
            .collect()
    }

    #[test]
    fn test_get_calendar() {
        let calendar = get_calendar(&get_test_workouts(), stamp());
        assert_eq!(calendar.events.len(), 2);
        let parsed = reparse(&calendar);
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(
            property_values(&parsed, "SUMMARY"),
            vec!["Swim Practice", "Track Workout"]
        );
        assert_eq!(
            property_values(&parsed, "LOCATION"),
            vec![
                "Shannon Center, 11600 Shannon Ave, Dublin CA",
                "Foothill High School, 4375 Foothill Rd, Pleasanton CA"
            ]
        );
        assert_eq!(
            property_values(&parsed, "DTSTART"),
            vec!["20240602T130000Z", "20240604T013000Z"]
        );
        assert_eq!(
            property_values(&parsed, "DTEND"),
            vec!["20240602T143000Z", "20240604T030000Z"]
        );
        assert_eq!(
            property_values(&parsed, "UID"),
            vec![
                "20240602T130000Z-20240602T143000Z@trivalleytriclub.com",
                "20240604T013000Z-20240604T030000Z@trivalleytriclub.com"
            ]
        );
        assert_eq!(
            property_values(&parsed, "DTSTAMP"),
            vec!["20240601T081530Z", "20240601T081530Z"]
        );
        assert_eq!(
            property_values(&parsed, "TRANSP"),
            vec!["TRANSPARENT", "TRANSPARENT"]
        );
    }

    #[test]
    fn test_get_calendar_header() {
        let generated = get_calendar(&[], stamp()).generate();
        assert!(generated.starts_with("BEGIN:VCALENDAR"));
        assert!(generated.contains("VERSION:2.0"));
        assert!(generated.contains("PRODID:-//Tri-Valley Triathlon Club//trivalleytriclub.com//"));
        assert!(generated.contains("METHOD:PUBLISH"));
        assert!(!generated.contains("BEGIN:VEVENT"));
        assert!(generated.trim_end().ends_with("END:VCALENDAR"));
    }

    #[test]
    fn test_get_calendar_is_repeatable() {
        let first = get_calendar(&get_test_workouts(), stamp()).generate();
        let second = get_calendar(&get_test_workouts(), stamp()).generate();
        assert_eq!(first, second);
        let later = get_calendar(&get_test_workouts(), stamp() + Duration::seconds(1)).generate();
        let without_stamp = |generated: &str| -> Vec<String> {
            generated
                .lines()
                .filter(|line| !line.starts_with("DTSTAMP"))
                .map(String::from)
                .collect()
        };
        assert_ne!(first, later);
        assert_eq!(without_stamp(&first), without_stamp(&later));
    }

    #[test]
    fn test_write_calendar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tvtc.ical");
        std::fs::write(&path, "stale content that is longer than nothing").unwrap();
        let calendar = get_calendar(&[], stamp());
        write_calendar(&path, &calendar).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), calendar.generate());
    }

    #[test]
    fn test_write_calendar_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("tvtc.ical");
        let err = write_calendar(&path, &get_calendar(&[], stamp())).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
