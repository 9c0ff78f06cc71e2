//! Reading, updating and deleting booked appointments.
//!
//! Moving an active appointment to a new time, or reactivating one, re-runs
//! the availability and conflict checks. Cancelling, deleting or moving an
//! appointment releases the pause its booking added to the schedule.

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::BookingService;
use super::booking::{BookingRejection, admit};
use crate::availability::PauseScope;
use crate::conflict::TimeRange;
use crate::errors::{CareError, CareResult};
use crate::models::appointment::{Appointment, AppointmentStats, UpdateAppointmentRequest};
use crate::store::SlotClaim;

impl BookingService {
    pub async fn get_appointment(&self, id: Uuid) -> CareResult<Appointment> {
        self.appointments
            .get_appointment(id)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("Appointment with ID {} not found", id)))
    }

    pub async fn list_doctor_appointments(
        &self,
        doctor_id: Uuid,
        range: Option<TimeRange>,
    ) -> CareResult<Vec<Appointment>> {
        match range {
            Some(range) => self.appointments.find_appointments(doctor_id, range).await,
            None => self.appointments.list_doctor_appointments(doctor_id).await,
        }
    }

    pub async fn appointment_stats(&self, doctor_id: Uuid) -> CareResult<AppointmentStats> {
        let appointments = self.appointments.list_doctor_appointments(doctor_id).await?;
        Ok(appointments.iter().collect())
    }

    pub async fn update_appointment(&self, id: Uuid, request: UpdateAppointmentRequest) -> CareResult<Appointment> {
        let mut appointment = self.get_appointment(id).await?;
        let was_active = appointment.status.is_active();
        let target = request.date_time.unwrap_or(appointment.date_time);
        let moving = target != appointment.date_time;

        if let Some(status) = request.status {
            appointment.status = status;
        }
        if let Some(note) = request.note {
            appointment.note = Some(note);
        }

        // An active appointment that moves or comes back must win its slot again.
        let (updated, slot_label) = if appointment.status.is_active() && (moving || !was_active) {
            let (claimed, label) = self.claim_existing(appointment, target).await?;
            (claimed, Some(label))
        } else {
            appointment.date_time = target;
            (self.appointments.update_appointment(appointment).await?, None)
        };
        info!("Updated appointment {} (status {})", updated.id, updated.status);

        if moving || (was_active && !updated.status.is_active()) {
            self.release_booked_time(&updated).await;
        }
        if let Some(label) = slot_label {
            self.block_booked_time(&updated, &label).await;
        }

        Ok(updated)
    }

    /// Claims `target` for `appointment` and writes it with its other
    /// changes, returning the stored appointment and the label of the day
    /// entry it landed on.
    async fn claim_existing(
        &self,
        mut appointment: Appointment,
        target: DateTime<Utc>,
    ) -> CareResult<(Appointment, String)> {
        let schedule = self.active_schedule(appointment.doctor_id).await?;
        let local = self.local_time(target);
        let day_label = admit(&schedule, local, PauseScope::DeclaredBreaks)?.day.clone();

        debug!("Moving appointment {} to {} on {}", appointment.id, target, day_label);

        appointment.date_time = target;
        appointment.duration_minutes = schedule.appointment_duration;

        match self
            .appointments
            .reschedule_slot(appointment, self.settings.conflict_policy)
            .await?
        {
            SlotClaim::Claimed(moved) => Ok((moved, day_label)),
            SlotClaim::Taken(report) => Err(BookingRejection::SlotConflict {
                conflicting: report.conflicting,
            }
            .into()),
        }
    }

    pub async fn delete_appointment(&self, id: Uuid) -> CareResult<()> {
        let appointment = self.get_appointment(id).await?;

        if !self.appointments.delete_appointment(id).await? {
            return Err(CareError::NotFound(format!("Appointment with ID {} not found", id)));
        }
        info!("Deleted appointment {}", id);

        self.release_booked_time(&appointment).await;
        Ok(())
    }
}
