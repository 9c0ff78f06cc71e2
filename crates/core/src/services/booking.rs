//! Availability checks and the booking orchestrator.
//!
//! A booking attempt ends either in a persisted [`Appointment`] or in a
//! [`BookingRejection`] that tells the caller exactly why, so it can offer a
//! remedy (the waiting list, another time).
//!
//! ## Booking steps
//!
//! 1. Resolve the day, window and declared breaks for the requested instant.
//! 2. Claim the slot: conflict detection and insert run as one atomic store
//!    operation.
//! 3. Notify the doctor. Failures are logged and swallowed.
//! 4. Add a pause covering the booked time to the day entry matched in
//!    step 1. Failures are logged and swallowed.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::BookingService;
use crate::availability::{AvailableSlot, PauseScope, Resolution, day_label, resolve};
use crate::conflict::{ConflictReport, SlotRequest, check_conflicts};
use crate::errors::{CareError, CareResult};
use crate::interval::{Pause, TimeOfDay};
use crate::models::appointment::{Appointment, BookAppointmentRequest, NewAppointment};
use crate::models::schedule::{DayAvailability, Schedule};
use crate::store::SlotClaim;

/// Why a requested slot cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BookingRejection {
    #[error("Doctor {doctor_id} has no active schedule")]
    NoActiveSchedule { doctor_id: Uuid },

    #[error(
        "{requested_date_label} is not available. Available days: {}",
        .available_days.join(", ")
    )]
    DateNotAvailable {
        requested_date_label: String,
        available_days: Vec<String>,
        can_join_waiting_list: bool,
    },

    #[error("Requested time is outside working hours on {day_name} ({start} - {end})")]
    OutsideWorkingHours {
        day_name: String,
        start: TimeOfDay,
        end: TimeOfDay,
    },

    #[error("Doctor is on a break from {start} to {end}")]
    OnBreak { start: TimeOfDay, end: TimeOfDay },

    #[error("This slot or a nearby slot is already booked")]
    SlotConflict { conflicting: Vec<Uuid> },
}

/// Result of [`BookingService::check_availability`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityReport {
    pub is_available: bool,
    pub available_slot: Option<AvailableSlot>,
    pub available_days: Vec<String>,
    pub can_join_waiting_list: bool,
    pub requested_date_label: String,
    pub reason: Option<BookingRejection>,
}

/// Resolves `local` and turns every negative outcome into its rejection.
pub(crate) fn admit(
    schedule: &Schedule,
    local: NaiveDateTime,
    scope: PauseScope,
) -> Result<&DayAvailability, BookingRejection> {
    match resolve(schedule, local, scope) {
        Resolution::Available(day) => Ok(day),
        Resolution::DateNotAvailable => Err(BookingRejection::DateNotAvailable {
            requested_date_label: day_label(local.date()),
            available_days: schedule.list_day_labels(),
            can_join_waiting_list: true,
        }),
        Resolution::OutsideWorkingHours(day) => Err(BookingRejection::OutsideWorkingHours {
            day_name: day.day.clone(),
            start: day.start_time,
            end: day.end_time,
        }),
        Resolution::OnBreak { pause, .. } => Err(BookingRejection::OnBreak {
            start: pause.start,
            end: pause.end,
        }),
    }
}

impl BookingService {
    pub(crate) async fn active_schedule(&self, doctor_id: Uuid) -> CareResult<Schedule> {
        self.schedules
            .get_schedule_by_doctor(doctor_id)
            .await?
            .ok_or_else(|| BookingRejection::NoActiveSchedule { doctor_id }.into())
    }

    /// Reports whether `at` can be booked with `doctor_id`.
    ///
    /// Read-only. Every pause blocks here, including pauses derived from
    /// earlier bookings.
    pub async fn check_availability(&self, doctor_id: Uuid, at: DateTime<Utc>) -> CareResult<AvailabilityReport> {
        let local = self.local_time(at);
        let requested_date_label = day_label(local.date());

        let Some(schedule) = self.schedules.get_schedule_by_doctor(doctor_id).await? else {
            debug!("No schedule for doctor {}, nothing is available", doctor_id);
            return Ok(AvailabilityReport {
                is_available: false,
                available_slot: None,
                available_days: Vec::new(),
                can_join_waiting_list: false,
                requested_date_label,
                reason: Some(BookingRejection::NoActiveSchedule { doctor_id }),
            });
        };

        let available_days = schedule.list_day_labels();
        let report = match admit(&schedule, local, PauseScope::All) {
            Ok(day) => AvailabilityReport {
                is_available: true,
                available_slot: Some(AvailableSlot::from_entry(day, schedule.appointment_duration)),
                available_days,
                can_join_waiting_list: false,
                requested_date_label,
                reason: None,
            },
            Err(rejection) => AvailabilityReport {
                is_available: false,
                available_slot: None,
                available_days,
                can_join_waiting_list: matches!(rejection, BookingRejection::DateNotAvailable { .. }),
                requested_date_label,
                reason: Some(rejection),
            },
        };

        debug!(
            "Availability for doctor {} at {}: available={}",
            doctor_id, local, report.is_available
        );
        Ok(report)
    }

    /// Read-only conflict probe for `at` using the doctor's appointment duration.
    pub async fn find_conflicts(&self, doctor_id: Uuid, at: DateTime<Utc>) -> CareResult<Option<ConflictReport>> {
        let schedule = self.active_schedule(doctor_id).await?;
        let request = SlotRequest {
            doctor_id,
            start: at,
            duration_minutes: schedule.appointment_duration,
            exclude: None,
        };
        check_conflicts(self.appointments.as_ref(), self.settings.conflict_policy, &request).await
    }

    /// Books an appointment, or explains why it cannot be booked.
    pub async fn book(&self, request: BookAppointmentRequest) -> CareResult<Appointment> {
        let local = self.local_time(request.date_time);
        debug!(
            "Booking request: doctor={}, patient={}, at={} (local {})",
            request.doctor_id, request.patient_id, request.date_time, local
        );

        let schedule = self.active_schedule(request.doctor_id).await?;
        let day = admit(&schedule, local, PauseScope::DeclaredBreaks).map_err(|rejection| {
            info!("Booking for doctor {} rejected: {}", request.doctor_id, rejection);
            CareError::Rejected(rejection)
        })?;
        let day_label = day.day.clone();

        let new_appointment = NewAppointment {
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            date_time: request.date_time,
            duration_minutes: schedule.appointment_duration,
            status: request.status.unwrap_or_default(),
            note: request.note,
        };

        let appointment = match self
            .appointments
            .claim_slot(new_appointment, self.settings.conflict_policy)
            .await?
        {
            SlotClaim::Claimed(appointment) => appointment,
            SlotClaim::Taken(report) => {
                warn!(
                    "Conflict detected for doctor {} at {} - {} conflicting appointments",
                    request.doctor_id,
                    request.date_time,
                    report.conflicting.len()
                );
                return Err(BookingRejection::SlotConflict {
                    conflicting: report.conflicting,
                }
                .into());
            }
        };

        info!(
            "Booked appointment {} for doctor {} at {}",
            appointment.id, appointment.doctor_id, appointment.date_time
        );

        self.notify_best_effort(&appointment).await;
        self.block_booked_time(&appointment, &day_label).await;

        Ok(appointment)
    }

    async fn notify_best_effort(&self, appointment: &Appointment) {
        let result = self
            .notifier
            .notify_doctor_of_new_appointment(
                appointment.doctor_id,
                appointment.patient_id,
                appointment.id,
                appointment.date_time,
            )
            .await;

        if let Err(e) = result {
            warn!(
                "Failed to notify doctor {} of appointment {}: {}",
                appointment.doctor_id, appointment.id, e
            );
        }
    }

    /// Adds the pause covering `appointment` to the entry labelled `day_label`.
    pub(crate) async fn block_booked_time(&self, appointment: &Appointment, day_label: &str) {
        let local = self.local_time(appointment.date_time);
        let pause = Pause::covering(local, appointment.duration_minutes, appointment.id);
        debug!(
            "Blocking {} - {} on {} for appointment {}",
            pause.start, pause.end, day_label, appointment.id
        );

        if let Err(e) = self
            .schedules
            .add_pause(appointment.doctor_id, day_label.to_string(), pause)
            .await
        {
            warn!(
                "Could not block booked time for appointment {} on {}: {}",
                appointment.id, day_label, e
            );
        }
    }

    /// Removes the pause derived from `appointment`, if any.
    pub(crate) async fn release_booked_time(&self, appointment: &Appointment) {
        match self
            .schedules
            .remove_appointment_pauses(appointment.doctor_id, appointment.id)
            .await
        {
            Ok(removed) => debug!("Released {} pause(s) of appointment {}", removed, appointment.id),
            Err(e) => warn!(
                "Could not release booked time of appointment {}: {}",
                appointment.id, e
            ),
        }
    }
}
