use chrono::{Datelike, Days, NaiveDate, Weekday};

use crate::error::{CoachError, Result};

/// Parse a full English weekday name, case-insensitively
pub fn parse_day(label: &str) -> Option<Weekday> {
    // Surrounding whitespace is ignored, so " Sunday " counts as Sunday in a
    // bulk plan save instead of being dropped with the unknown labels
    let day = match label.trim().to_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

/// Calendar date of `day` in the week beginning at `week_start`
pub fn date_in_week(week_start: NaiveDate, day: Weekday) -> Result<NaiveDate> {
    add_days(week_start, u64::from(day.num_days_from_monday()))
}

/// Last day of the 7-day window starting at `week_start`
pub fn week_end(week_start: NaiveDate) -> Result<NaiveDate> {
    add_days(week_start, 6)
}

/// Monday of the week containing `date`
pub fn monday_of(date: NaiveDate) -> Result<NaiveDate> {
    sub_days(date, u64::from(date.weekday().num_days_from_monday()))
}

pub fn add_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_add_days(Days::new(days))
        .ok_or_else(|| CoachError::DateOutOfRange(format!("{} + {} days", date, days)))
}

pub fn sub_days(date: NaiveDate, days: u64) -> Result<NaiveDate> {
    date.checked_sub_days(Days::new(days))
        .ok_or_else(|| CoachError::DateOutOfRange(format!("{} - {} days", date, days)))
}
