//! # Weekly Schedule
//!
//! Lookups and mutations on a doctor's per-day availability entries.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::availability::find_entry;
use crate::errors::{CareError, CareResult};
use crate::interval::Pause;
use crate::models::schedule::{DayAvailability, Schedule, UpdateScheduleRequest};

/// Normalises a day label for comparison: trimmed and lowercased.
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

impl Schedule {
    /// Finds the entry whose label equals `label`, ignoring case and
    /// surrounding whitespace. No partial matching is performed.
    pub fn find_day(&self, label: &str) -> Option<&DayAvailability> {
        let wanted = normalize_label(label);
        self.availability
            .iter()
            .find(|entry| normalize_label(&entry.day) == wanted)
    }

    fn find_day_mut(&mut self, label: &str) -> Option<&mut DayAvailability> {
        let wanted = normalize_label(label);
        self.availability
            .iter_mut()
            .find(|entry| normalize_label(&entry.day) == wanted)
    }

    /// All day labels in storage order.
    pub fn list_day_labels(&self) -> Vec<String> {
        self.availability.iter().map(|entry| entry.day.clone()).collect()
    }

    /// Appends `pause` to the entry matching `label`.
    pub fn add_pause(&mut self, label: &str, pause: Pause) -> CareResult<()> {
        let entry = self
            .find_day_mut(label)
            .ok_or_else(|| CareError::DayNotFound(label.to_string()))?;
        entry.pauses.push(pause);
        Ok(())
    }

    /// Drops every pause derived from `appointment_id`, returning how many were removed.
    pub fn remove_appointment_pauses(&mut self, appointment_id: Uuid) -> usize {
        let mut removed = 0;
        for entry in &mut self.availability {
            let before = entry.pauses.len();
            entry
                .pauses
                .retain(|pause| pause.appointment_id != Some(appointment_id));
            removed += before - entry.pauses.len();
        }
        removed
    }

    /// Applies the doctor-supplied fields of `request`.
    ///
    /// Booking pauses are owned by their appointments: any in the incoming
    /// availability are ignored, and the stored ones are carried over to the
    /// entry that now resolves their date (or, failing that, the entry with
    /// the same label). A pause whose day no longer exists is dropped.
    pub fn apply_update(&mut self, request: UpdateScheduleRequest) -> CareResult<()> {
        let duration = request
            .appointment_duration
            .unwrap_or(self.appointment_duration);

        let Some(mut availability) = request.availability else {
            validate_availability(&self.availability, duration)?;
            self.appointment_duration = duration;
            return Ok(());
        };

        for entry in &mut availability {
            entry.pauses.retain(|pause| !pause.is_booking());
        }
        validate_availability(&availability, duration)?;

        let carried: Vec<(String, Pause)> = self
            .availability
            .iter()
            .flat_map(|entry| {
                entry
                    .pauses
                    .iter()
                    .filter(|pause| pause.is_booking())
                    .map(move |pause| (entry.day.clone(), pause.clone()))
            })
            .collect();

        self.availability = availability;
        self.appointment_duration = duration;

        for (label, pause) in carried {
            let target = pause
                .date
                .and_then(|date| find_entry(&*self, date))
                .or_else(|| self.find_day(&label))
                .map(|entry| entry.day.clone());

            match target {
                Some(target) => self.add_pause(&target, pause)?,
                None => debug!(
                    "Dropping pause {} - {} of appointment {:?}, {} is no longer scheduled",
                    pause.start, pause.end, pause.appointment_id, label
                ),
            }
        }

        Ok(())
    }
}

/// Checks the fields a doctor supplies when creating or replacing a schedule.
pub fn validate_availability(availability: &[DayAvailability], appointment_duration: i32) -> CareResult<()> {
    if availability.is_empty() {
        return Err(CareError::Validation(
            "Schedule must contain at least one day of availability".to_string(),
        ));
    }

    if appointment_duration <= 0 {
        return Err(CareError::Validation(format!(
            "Appointment duration must be a positive number of minutes, got {}",
            appointment_duration
        )));
    }

    let mut seen = HashSet::new();
    for entry in availability {
        let label = normalize_label(&entry.day);
        if label.is_empty() {
            return Err(CareError::Validation("Day label must not be empty".to_string()));
        }
        if !seen.insert(label) {
            return Err(CareError::Validation(format!(
                "Day label {:?} appears more than once",
                entry.day
            )));
        }
        if entry.start_time >= entry.end_time {
            return Err(CareError::Validation(format!(
                "Start time {} must be before end time {} on {}",
                entry.start_time, entry.end_time, entry.day
            )));
        }
        for pause in entry.pauses.iter().filter(|pause| !pause.is_booking()) {
            if pause.start >= pause.end {
                return Err(CareError::Validation(format!(
                    "Pause {} - {} on {} must start before it ends",
                    pause.start, pause.end, entry.day
                )));
            }
        }
    }

    Ok(())
}
