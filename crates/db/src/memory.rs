//! In-process store used by tests and by local runs without PostgreSQL.
//!
//! Each map sits behind one lock, so a conflict check and the insert it
//! guards happen under the same write guard.

use std::collections::HashMap;

use async_trait::async_trait;
use carebook_core::conflict::{ConflictPolicy, SlotRequest, TimeRange};
use carebook_core::errors::{CareError, CareResult};
use carebook_core::interval::Pause;
use carebook_core::models::appointment::{Appointment, NewAppointment};
use carebook_core::models::schedule::{CreateScheduleRequest, Schedule, UpdateScheduleRequest};
use carebook_core::store::{AppointmentStore, ScheduleStore, SlotClaim};
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
pub struct MemoryStore {
    schedules: RwLock<HashMap<Uuid, Schedule>>,
    appointments: RwLock<HashMap<Uuid, Appointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an appointment as-is, bypassing conflict detection.
    pub async fn insert_appointment(&self, appointment: Appointment) {
        self.appointments
            .write()
            .await
            .insert(appointment.id, appointment);
    }

    fn overwrite(stored: &mut Appointment, appointment: Appointment) {
        stored.date_time = appointment.date_time;
        stored.duration_minutes = appointment.duration_minutes;
        stored.status = appointment.status;
        stored.note = appointment.note;
        stored.updated_at = Utc::now();
    }

    fn doctor_appointments(
        appointments: &HashMap<Uuid, Appointment>,
        doctor_id: Uuid,
        range: Option<TimeRange>,
    ) -> Vec<Appointment> {
        let mut found: Vec<Appointment> = appointments
            .values()
            .filter(|a| a.doctor_id == doctor_id)
            .filter(|a| range.is_none_or(|r| r.contains(a.date_time)))
            .cloned()
            .collect();
        found.sort_by_key(|a| a.date_time);
        found
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn create_schedule(&self, request: CreateScheduleRequest) -> CareResult<Schedule> {
        let mut schedules = self.schedules.write().await;
        if schedules.values().any(|s| s.doctor_id == request.doctor_id) {
            return Err(CareError::Conflict(format!(
                "Doctor {} already has a schedule",
                request.doctor_id
            )));
        }

        let now = Utc::now();
        let schedule = Schedule {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            availability: request.availability,
            appointment_duration: request.appointment_duration,
            created_at: now,
            updated_at: now,
        };
        schedules.insert(schedule.id, schedule.clone());
        tracing::debug!("Stored schedule {} in memory", schedule.id);
        Ok(schedule)
    }

    async fn get_schedule(&self, id: Uuid) -> CareResult<Option<Schedule>> {
        Ok(self.schedules.read().await.get(&id).cloned())
    }

    async fn get_schedule_by_doctor(&self, doctor_id: Uuid) -> CareResult<Option<Schedule>> {
        Ok(self
            .schedules
            .read()
            .await
            .values()
            .find(|s| s.doctor_id == doctor_id)
            .cloned())
    }

    async fn update_schedule(&self, id: Uuid, request: UpdateScheduleRequest) -> CareResult<Schedule> {
        let mut schedules = self.schedules.write().await;
        let stored = schedules
            .get_mut(&id)
            .ok_or_else(|| CareError::NotFound(format!("Schedule with ID {} not found", id)))?;

        let mut updated = stored.clone();
        updated.apply_update(request)?;
        updated.updated_at = Utc::now();
        *stored = updated.clone();
        Ok(updated)
    }

    async fn delete_schedule(&self, id: Uuid) -> CareResult<bool> {
        Ok(self.schedules.write().await.remove(&id).is_some())
    }

    async fn add_pause(&self, doctor_id: Uuid, day_label: String, pause: Pause) -> CareResult<()> {
        let mut schedules = self.schedules.write().await;
        let schedule = schedules
            .values_mut()
            .find(|s| s.doctor_id == doctor_id)
            .ok_or_else(|| CareError::NotFound(format!("No schedule for doctor {}", doctor_id)))?;

        schedule.add_pause(&day_label, pause)?;
        schedule.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_appointment_pauses(&self, doctor_id: Uuid, appointment_id: Uuid) -> CareResult<usize> {
        let mut schedules = self.schedules.write().await;
        let removed = schedules
            .values_mut()
            .find(|s| s.doctor_id == doctor_id)
            .map_or(0, |s| s.remove_appointment_pauses(appointment_id));
        Ok(removed)
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn claim_slot(&self, appointment: NewAppointment, policy: ConflictPolicy) -> CareResult<SlotClaim> {
        let request = SlotRequest {
            doctor_id: appointment.doctor_id,
            start: appointment.date_time,
            duration_minutes: appointment.duration_minutes,
            exclude: None,
        };

        let mut appointments = self.appointments.write().await;
        let existing = Self::doctor_appointments(&appointments, request.doctor_id, Some(policy.probe_range(&request)));
        if let Some(report) = policy.detect(&request, &existing) {
            return Ok(SlotClaim::Taken(report));
        }

        let now = Utc::now();
        let created = Appointment {
            id: Uuid::new_v4(),
            doctor_id: appointment.doctor_id,
            patient_id: appointment.patient_id,
            date_time: appointment.date_time,
            duration_minutes: appointment.duration_minutes,
            status: appointment.status,
            note: appointment.note,
            created_at: now,
            updated_at: now,
        };
        appointments.insert(created.id, created.clone());
        Ok(SlotClaim::Claimed(created))
    }

    async fn reschedule_slot(&self, appointment: Appointment, policy: ConflictPolicy) -> CareResult<SlotClaim> {
        let request = SlotRequest::held_by(&appointment);
        let mut appointments = self.appointments.write().await;
        if !appointments.contains_key(&appointment.id) {
            return Err(CareError::NotFound(format!("Appointment with ID {} not found", appointment.id)));
        }

        let existing = Self::doctor_appointments(&appointments, request.doctor_id, Some(policy.probe_range(&request)));
        if let Some(report) = policy.detect(&request, &existing) {
            return Ok(SlotClaim::Taken(report));
        }

        let stored = appointments
            .get_mut(&appointment.id)
            .ok_or_else(|| CareError::NotFound(format!("Appointment with ID {} not found", appointment.id)))?;
        Self::overwrite(stored, appointment);
        Ok(SlotClaim::Claimed(stored.clone()))
    }

    async fn get_appointment(&self, id: Uuid) -> CareResult<Option<Appointment>> {
        Ok(self.appointments.read().await.get(&id).cloned())
    }

    async fn find_appointments(&self, doctor_id: Uuid, range: TimeRange) -> CareResult<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(Self::doctor_appointments(&appointments, doctor_id, Some(range)))
    }

    async fn list_doctor_appointments(&self, doctor_id: Uuid) -> CareResult<Vec<Appointment>> {
        let appointments = self.appointments.read().await;
        Ok(Self::doctor_appointments(&appointments, doctor_id, None))
    }

    async fn update_appointment(&self, appointment: Appointment) -> CareResult<Appointment> {
        let mut appointments = self.appointments.write().await;
        let stored = appointments
            .get_mut(&appointment.id)
            .ok_or_else(|| CareError::NotFound(format!("Appointment with ID {} not found", appointment.id)))?;

        Self::overwrite(stored, appointment);
        Ok(stored.clone())
    }

    async fn delete_appointment(&self, id: Uuid) -> CareResult<bool> {
        Ok(self.appointments.write().await.remove(&id).is_some())
    }
}
