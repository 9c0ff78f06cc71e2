//! # Availability Resolver
//!
//! Decides whether a requested wall-clock instant can be booked against a
//! schedule. The checks run in a fixed order, each mapping to its own
//! user-facing reason:
//!
//! 1. the day label must match a schedule entry,
//! 2. the time must fall inside that entry's working window,
//! 3. the time must fall outside every applicable pause.
//!
//! ## Day labels
//!
//! A requested date is looked up under two exact keys, in order: the
//! date-qualified label (`"Friday July 25"`) and the bare weekday name
//! (`"Friday"`). The label format is a contract with whoever writes the
//! schedule and must be reproduced exactly; see [`day_label`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::interval::{Interval, Pause, TimeOfDay};
use crate::models::schedule::{DayAvailability, Schedule};

/// Which pauses block a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseScope {
    /// Every pause applicable on the requested date.
    All,
    /// Only breaks declared by the doctor. Booked time is left to the
    /// conflict detector, which reads the appointments themselves.
    DeclaredBreaks,
}

impl PauseScope {
    fn admits(&self, pause: &Pause) -> bool {
        match self {
            PauseScope::All => true,
            PauseScope::DeclaredBreaks => !pause.is_booking(),
        }
    }
}

/// Outcome of resolving one instant against a schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    Available(&'a DayAvailability),
    DateNotAvailable,
    OutsideWorkingHours(&'a DayAvailability),
    OnBreak {
        day: &'a DayAvailability,
        pause: &'a Pause,
    },
}

impl Resolution<'_> {
    pub fn is_available(&self) -> bool {
        matches!(self, Resolution::Available(_))
    }
}

/// Formats a date the way schedule entries are labelled: weekday full name,
/// month full name, day of month without a leading zero (`"Friday July 25"`).
pub fn day_label(date: NaiveDate) -> String {
    date.format("%A %B %-d").to_string()
}

/// The bare weekday name of a date (`"Friday"`).
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Finds the entry for `date`: a date-qualified entry first, then the
/// recurring weekday entry.
pub fn find_entry(schedule: &Schedule, date: NaiveDate) -> Option<&DayAvailability> {
    schedule
        .find_day(&day_label(date))
        .or_else(|| schedule.find_day(&weekday_label(date)))
}

/// Resolves `local` (wall-clock time in the clinic timezone) against `schedule`.
pub fn resolve(schedule: &Schedule, local: NaiveDateTime, scope: PauseScope) -> Resolution<'_> {
    let date = local.date();
    let time = TimeOfDay::from(local.time());

    let Some(day) = find_entry(schedule, date) else {
        return Resolution::DateNotAvailable;
    };

    if !day.contains(time) {
        return Resolution::OutsideWorkingHours(day);
    }

    let blocking = day
        .pauses
        .iter()
        .filter(|pause| pause.applies_on(date) && scope.admits(pause))
        .find(|pause| pause.contains(time));

    match blocking {
        Some(pause) => Resolution::OnBreak { day, pause },
        None => Resolution::Available(day),
    }
}

/// The bookable slot returned alongside a positive availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableSlot {
    pub day: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub appointment_duration: i32,
}

impl AvailableSlot {
    pub fn from_entry(entry: &DayAvailability, appointment_duration: i32) -> Self {
        Self {
            day: entry.day.clone(),
            start_time: entry.start_time,
            end_time: entry.end_time,
            appointment_duration,
        }
    }
}
