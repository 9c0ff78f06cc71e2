//! # Interval Model
//!
//! Wall-clock times of day and the half-open intervals built from them.
//! A working day is a `[start, end)` window with a list of excluded
//! sub-intervals ("pauses"). Everything here is pure value logic.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};

/// A wall-clock time within a single day, written as `"HH:MM"`.
///
/// Boundaries parsed from schedule data have zero seconds. Times taken from a
/// requested instant keep their seconds so that `16:59:30` still falls inside
/// a window ending at `17:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Builds a time from hour and minute components.
    pub fn new(hour: u32, minute: u32) -> CareResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(TimeOfDay)
            .ok_or_else(|| CareError::MalformedTime(format!("{:02}:{:02}", hour, minute)))
    }

    /// The last representable minute of a day (`23:59`).
    pub fn last_minute() -> Self {
        TimeOfDay(NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::default()))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// Adds whole minutes, returning `None` when the result would cross midnight.
    pub fn checked_add_minutes(&self, minutes: i64) -> Option<Self> {
        let (time, wrapped_secs) = self.0.overflowing_add_signed(Duration::minutes(minutes));
        if wrapped_secs == 0 {
            Some(TimeOfDay(time))
        } else {
            None
        }
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        TimeOfDay(time)
    }
}

/// Parses `"HH:MM"` into a [`TimeOfDay`].
///
/// Each component must be one or two ASCII digits; the hour must be below 24
/// and the minute below 60. Surrounding whitespace is ignored.
pub fn parse_time_of_day(text: &str) -> CareResult<TimeOfDay> {
    let malformed = || CareError::MalformedTime(text.to_string());

    let (hour, minute) = text.trim().split_once(':').ok_or_else(malformed)?;

    let component = |part: &str| -> CareResult<u32> {
        if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        part.parse::<u32>().map_err(|_| malformed())
    };

    let hour = component(hour)?;
    let minute = component(minute)?;
    if hour >= 24 || minute >= 60 {
        return Err(malformed());
    }

    TimeOfDay::new(hour, minute)
}

impl FromStr for TimeOfDay {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time_of_day(s)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_time_of_day(&text).map_err(serde::de::Error::custom)
    }
}

/// A half-open `[start, end)` span of wall-clock time.
pub trait Interval {
    fn bounds(&self) -> (TimeOfDay, TimeOfDay);

    /// True iff `start <= time < end`. Only the time of day is compared.
    fn contains(&self, time: TimeOfDay) -> bool {
        let (start, end) = self.bounds();
        start <= time && time < end
    }
}

/// A period within a day during which the doctor cannot be booked.
///
/// Doctor-declared breaks carry neither `appointment_id` nor `date` and apply
/// to every occurrence of their day entry. Pauses derived from a booking are
/// tagged with the appointment and the calendar date they block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pause {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl Pause {
    /// A recurring break declared by the doctor.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Self {
        Self {
            start,
            end,
            appointment_id: None,
            date: None,
        }
    }

    /// The pause covering a booked appointment starting at `start`.
    ///
    /// The start is truncated to the minute. An end past midnight is clamped
    /// to the last minute of the day.
    pub fn covering(start: NaiveDateTime, duration_minutes: i32, appointment_id: Uuid) -> Self {
        let time = start.time();
        let begin = TimeOfDay::new(time.hour(), time.minute()).unwrap_or(TimeOfDay(NaiveTime::default()));
        let end = begin
            .checked_add_minutes(i64::from(duration_minutes))
            .unwrap_or_else(TimeOfDay::last_minute);

        Self {
            start: begin,
            end,
            appointment_id: Some(appointment_id),
            date: Some(start.date()),
        }
    }

    pub fn is_booking(&self) -> bool {
        self.appointment_id.is_some()
    }

    /// Undated pauses apply on every date; dated pauses only on their own.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.date.map_or(true, |d| d == date)
    }
}

impl Interval for Pause {
    fn bounds(&self) -> (TimeOfDay, TimeOfDay) {
        (self.start, self.end)
    }
}

/// True iff `time` falls within any of `pauses`.
pub fn overlaps_pause<'a, I>(pauses: I, time: TimeOfDay) -> bool
where
    I: IntoIterator<Item = &'a Pause>,
{
    pauses.into_iter().any(|pause| pause.contains(time))
}
