use carebook_core::models::schedule::DayAvailability;
use chrono::Utc;
use eyre::Result;
use sqlx::PgExecutor;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::DbSchedule;

const SCHEDULE_COLUMNS: &str =
    "id, doctor_id, availability, appointment_duration, created_at, updated_at";

pub async fn create_schedule<'e, E: PgExecutor<'e>>(
    executor: E,
    doctor_id: Uuid,
    availability: &[DayAvailability],
    appointment_duration: i32,
) -> Result<DbSchedule> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating schedule: id={}, doctor_id={}, days={}, duration={}",
        id,
        doctor_id,
        availability.len(),
        appointment_duration
    );

    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        INSERT INTO schedules (id, doctor_id, availability, appointment_duration, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING {SCHEDULE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(doctor_id)
    .bind(Json(availability))
    .bind(appointment_duration)
    .bind(now)
    .fetch_one(executor)
    .await?;

    tracing::debug!("Schedule created successfully: id={}", id);
    Ok(schedule)
}

pub async fn get_schedule_by_id<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<Option<DbSchedule>> {
    tracing::debug!("Getting schedule by id: {}", id);

    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(schedule)
}

pub async fn get_schedule_by_doctor<'e, E: PgExecutor<'e>>(
    executor: E,
    doctor_id: Uuid,
) -> Result<Option<DbSchedule>> {
    tracing::debug!("Getting schedule for doctor: {}", doctor_id);

    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE doctor_id = $1"
    ))
    .bind(doctor_id)
    .fetch_optional(executor)
    .await?;

    if schedule.is_none() {
        tracing::debug!("No schedule for doctor: {}", doctor_id);
    }

    Ok(schedule)
}

/// Same as [`get_schedule_by_doctor`] but locks the row until the
/// surrounding transaction ends.
pub async fn lock_schedule_by_doctor<'e, E: PgExecutor<'e>>(
    executor: E,
    doctor_id: Uuid,
) -> Result<Option<DbSchedule>> {
    tracing::debug!("Locking schedule of doctor: {}", doctor_id);

    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE doctor_id = $1 FOR UPDATE"
    ))
    .bind(doctor_id)
    .fetch_optional(executor)
    .await?;

    Ok(schedule)
}

/// Locks schedule `id` until the surrounding transaction ends.
pub async fn lock_schedule_by_id<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<Option<DbSchedule>> {
    tracing::debug!("Locking schedule: id={}", id);

    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(schedule)
}

pub async fn update_schedule<'e, E: PgExecutor<'e>>(
    executor: E,
    id: Uuid,
    availability: &[DayAvailability],
    appointment_duration: i32,
) -> Result<Option<DbSchedule>> {
    tracing::debug!("Updating schedule: id={}", id);

    let schedule = sqlx::query_as::<_, DbSchedule>(&format!(
        r#"
        UPDATE schedules
        SET availability = $2, appointment_duration = $3, updated_at = $4
        WHERE id = $1
        RETURNING {SCHEDULE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(Json(availability))
    .bind(appointment_duration)
    .bind(Utc::now())
    .fetch_optional(executor)
    .await?;

    Ok(schedule)
}

pub async fn delete_schedule<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting schedule: id={}", id);

    let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
