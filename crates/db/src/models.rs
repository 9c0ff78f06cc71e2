use carebook_core::models::appointment::{Appointment, AppointmentStatus};
use carebook_core::models::schedule::{DayAvailability, Schedule};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSchedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub availability: Json<Vec<DayAvailability>>,
    pub appointment_duration: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbSchedule> for Schedule {
    fn from(row: DbSchedule) -> Self {
        Schedule {
            id: row.id,
            doctor_id: row.doctor_id,
            availability: row.availability.0,
            appointment_duration: row.appointment_duration,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Status is kept as text so rows written by older clients still load.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Uuid,
    pub date_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub status: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbAppointment> for Appointment {
    fn from(row: DbAppointment) -> Self {
        Appointment {
            id: row.id,
            doctor_id: row.doctor_id,
            patient_id: row.patient_id,
            date_time: row.date_time,
            duration_minutes: row.duration_minutes,
            status: AppointmentStatus::from_legacy(&row.status),
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
