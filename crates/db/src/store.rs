//! PostgreSQL implementation of the booking stores.
//!
//! Conflict detection and the write it guards share one transaction holding
//! a per-doctor advisory lock. Pause edits lock the schedule row instead.

use async_trait::async_trait;
use carebook_core::conflict::{ConflictPolicy, ConflictReport, SlotRequest, TimeRange};
use carebook_core::errors::{CareError, CareResult};
use carebook_core::interval::Pause;
use carebook_core::models::appointment::{Appointment, NewAppointment};
use carebook_core::models::schedule::{CreateScheduleRequest, Schedule, UpdateScheduleRequest};
use carebook_core::store::{AppointmentStore, ScheduleStore, SlotClaim};
use eyre::WrapErr;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::DbPool;
use crate::repositories::{appointment as appointment_repo, schedule as schedule_repo};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// True when `report` wraps a PostgreSQL unique violation (SQLSTATE 23505).
fn is_unique_violation(report: &eyre::Report) -> bool {
    report
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|e| e.code())
        .is_some_and(|code| code == "23505")
}

/// Runs `policy` against the doctor's appointments as seen by `conn`.
async fn detect_in_tx(
    conn: &mut PgConnection,
    policy: ConflictPolicy,
    request: &SlotRequest,
) -> CareResult<Option<ConflictReport>> {
    appointment_repo::lock_doctor(&mut *conn, request.doctor_id).await?;

    let range = policy.probe_range(request);
    let existing: Vec<Appointment> =
        appointment_repo::find_appointments_in_range(&mut *conn, request.doctor_id, range.start, range.end)
            .await?
            .into_iter()
            .map(Appointment::from)
            .collect();

    Ok(policy.detect(request, &existing))
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn create_schedule(&self, request: CreateScheduleRequest) -> CareResult<Schedule> {
        let row = schedule_repo::create_schedule(
            &self.pool,
            request.doctor_id,
            &request.availability,
            request.appointment_duration,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CareError::Conflict(format!("Doctor {} already has a schedule", request.doctor_id))
            } else {
                CareError::from(e)
            }
        })?;
        Ok(row.into())
    }

    async fn get_schedule(&self, id: Uuid) -> CareResult<Option<Schedule>> {
        Ok(schedule_repo::get_schedule_by_id(&self.pool, id)
            .await?
            .map(Schedule::from))
    }

    async fn get_schedule_by_doctor(&self, doctor_id: Uuid) -> CareResult<Option<Schedule>> {
        Ok(schedule_repo::get_schedule_by_doctor(&self.pool, doctor_id)
            .await?
            .map(Schedule::from))
    }

    async fn update_schedule(&self, id: Uuid, request: UpdateScheduleRequest) -> CareResult<Schedule> {
        let mut tx = self.pool.begin().await.wrap_err("Failed to begin transaction")?;

        let mut schedule: Schedule = schedule_repo::lock_schedule_by_id(&mut *tx, id)
            .await?
            .map(Schedule::from)
            .ok_or_else(|| CareError::NotFound(format!("Schedule with ID {} not found", id)))?;

        schedule.apply_update(request)?;
        let updated = schedule_repo::update_schedule(
            &mut *tx,
            schedule.id,
            &schedule.availability,
            schedule.appointment_duration,
        )
        .await?
        .map(Schedule::from)
        .ok_or_else(|| CareError::NotFound(format!("Schedule with ID {} not found", id)))?;

        tx.commit().await.wrap_err("Failed to commit schedule update")?;
        Ok(updated)
    }

    async fn delete_schedule(&self, id: Uuid) -> CareResult<bool> {
        Ok(schedule_repo::delete_schedule(&self.pool, id).await?)
    }

    async fn add_pause(&self, doctor_id: Uuid, day_label: String, pause: Pause) -> CareResult<()> {
        let mut tx = self.pool.begin().await.wrap_err("Failed to begin transaction")?;

        let mut schedule: Schedule = schedule_repo::lock_schedule_by_doctor(&mut *tx, doctor_id)
            .await?
            .map(Schedule::from)
            .ok_or_else(|| CareError::NotFound(format!("No schedule for doctor {}", doctor_id)))?;

        schedule.add_pause(&day_label, pause)?;
        schedule_repo::update_schedule(
            &mut *tx,
            schedule.id,
            &schedule.availability,
            schedule.appointment_duration,
        )
        .await?;

        tx.commit().await.wrap_err("Failed to commit pause")?;
        Ok(())
    }

    async fn remove_appointment_pauses(&self, doctor_id: Uuid, appointment_id: Uuid) -> CareResult<usize> {
        let mut tx = self.pool.begin().await.wrap_err("Failed to begin transaction")?;

        let Some(row) = schedule_repo::lock_schedule_by_doctor(&mut *tx, doctor_id).await? else {
            return Ok(0);
        };
        let mut schedule = Schedule::from(row);

        let removed = schedule.remove_appointment_pauses(appointment_id);
        if removed > 0 {
            schedule_repo::update_schedule(
                &mut *tx,
                schedule.id,
                &schedule.availability,
                schedule.appointment_duration,
            )
            .await?;
        }

        tx.commit().await.wrap_err("Failed to commit pause removal")?;
        Ok(removed)
    }
}

#[async_trait]
impl AppointmentStore for PgStore {
    async fn claim_slot(&self, appointment: NewAppointment, policy: ConflictPolicy) -> CareResult<SlotClaim> {
        let request = SlotRequest {
            doctor_id: appointment.doctor_id,
            start: appointment.date_time,
            duration_minutes: appointment.duration_minutes,
            exclude: None,
        };

        let mut tx = self.pool.begin().await.wrap_err("Failed to begin transaction")?;

        if let Some(report) = detect_in_tx(&mut *tx, policy, &request).await? {
            tx.rollback().await.wrap_err("Failed to roll back")?;
            return Ok(SlotClaim::Taken(report));
        }

        let created = appointment_repo::create_appointment(&mut *tx, &appointment).await?;
        tx.commit().await.wrap_err("Failed to commit appointment")?;

        Ok(SlotClaim::Claimed(created.into()))
    }

    async fn reschedule_slot(&self, appointment: Appointment, policy: ConflictPolicy) -> CareResult<SlotClaim> {
        let request = SlotRequest::held_by(&appointment);
        let mut tx = self.pool.begin().await.wrap_err("Failed to begin transaction")?;

        if let Some(report) = detect_in_tx(&mut *tx, policy, &request).await? {
            tx.rollback().await.wrap_err("Failed to roll back")?;
            return Ok(SlotClaim::Taken(report));
        }

        let moved = appointment_repo::update_appointment(&mut *tx, &appointment)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("Appointment with ID {} not found", appointment.id)))?;
        tx.commit().await.wrap_err("Failed to commit appointment move")?;

        Ok(SlotClaim::Claimed(moved.into()))
    }

    async fn get_appointment(&self, id: Uuid) -> CareResult<Option<Appointment>> {
        Ok(appointment_repo::get_appointment_by_id(&self.pool, id)
            .await?
            .map(Appointment::from))
    }

    async fn find_appointments(&self, doctor_id: Uuid, range: TimeRange) -> CareResult<Vec<Appointment>> {
        let rows = appointment_repo::find_appointments_in_range(&self.pool, doctor_id, range.start, range.end).await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn list_doctor_appointments(&self, doctor_id: Uuid) -> CareResult<Vec<Appointment>> {
        let rows = appointment_repo::list_doctor_appointments(&self.pool, doctor_id).await?;
        Ok(rows.into_iter().map(Appointment::from).collect())
    }

    async fn update_appointment(&self, appointment: Appointment) -> CareResult<Appointment> {
        appointment_repo::update_appointment(&self.pool, &appointment)
            .await?
            .map(Appointment::from)
            .ok_or_else(|| CareError::NotFound(format!("Appointment with ID {} not found", appointment.id)))
    }

    async fn delete_appointment(&self, id: Uuid) -> CareResult<bool> {
        Ok(appointment_repo::delete_appointment(&self.pool, id).await?)
    }
}
