use carebook_core::models::appointment::{Appointment, NewAppointment};
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::PgExecutor;
use uuid::Uuid;

use crate::models::DbAppointment;

const APPOINTMENT_COLUMNS: &str =
    "id, doctor_id, patient_id, date_time, duration_minutes, status, note, created_at, updated_at";

/// Serialises booking writes per doctor for the rest of the transaction.
pub async fn lock_doctor<'e, E: PgExecutor<'e>>(executor: E, doctor_id: Uuid) -> Result<()> {
    tracing::debug!("Taking booking lock for doctor: {}", doctor_id);

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1::text))")
        .bind(doctor_id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn create_appointment<'e, E: PgExecutor<'e>>(
    executor: E,
    appointment: &NewAppointment,
) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating appointment: id={}, doctor_id={}, patient_id={}, date_time={}",
        id,
        appointment.doctor_id,
        appointment.patient_id,
        appointment.date_time
    );

    let created = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (id, doctor_id, patient_id, date_time, duration_minutes, status, note, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(appointment.doctor_id)
    .bind(appointment.patient_id)
    .bind(appointment.date_time)
    .bind(appointment.duration_minutes)
    .bind(appointment.status.as_str())
    .bind(appointment.note.as_deref())
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(created)
}

pub async fn get_appointment_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    tracing::debug!("Getting appointment by id: {}", id);

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(appointment)
}

/// Appointments of a doctor starting in `[start, end)`, earliest first.
pub async fn find_appointments_in_range<'e, E: PgExecutor<'e>>(
    executor: E,
    doctor_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    tracing::debug!(
        "Finding appointments for doctor {} between {} and {}",
        doctor_id,
        start,
        end
    );

    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE doctor_id = $1 AND date_time >= $2 AND date_time < $3
        ORDER BY date_time
        "#
    ))
    .bind(doctor_id)
    .bind(start)
    .bind(end)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

pub async fn list_doctor_appointments<'e, E: PgExecutor<'e>>(
    executor: E,
    doctor_id: Uuid,
) -> Result<Vec<DbAppointment>> {
    tracing::debug!("Listing appointments for doctor: {}", doctor_id);

    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        "SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE doctor_id = $1 ORDER BY date_time"
    ))
    .bind(doctor_id)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

/// Writes the mutable fields of an appointment.
pub async fn update_appointment<'e, E: PgExecutor<'e>>(
    executor: E,
    appointment: &Appointment,
) -> Result<Option<DbAppointment>> {
    tracing::debug!(
        "Updating appointment: id={}, date_time={}, status={}",
        appointment.id,
        appointment.date_time,
        appointment.status
    );

    let updated = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET date_time = $2, duration_minutes = $3, status = $4, note = $5, updated_at = $6
        WHERE id = $1
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(appointment.id)
    .bind(appointment.date_time)
    .bind(appointment.duration_minutes)
    .bind(appointment.status.as_str())
    .bind(appointment.note.as_deref())
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?;

    Ok(updated)
}

pub async fn delete_appointment<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting appointment: id={}", id);

    let result = sqlx::query("DELETE FROM appointments WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
