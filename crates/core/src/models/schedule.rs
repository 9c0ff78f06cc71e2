use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::{Interval, Pause, TimeOfDay};

/// One entry of a doctor's schedule.
///
/// `day` is either a bare weekday name (`"Monday"`, recurring every week) or
/// a date-qualified label (`"Friday July 25"`, a single occurrence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub day: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub pauses: Vec<Pause>,
}

impl Interval for DayAvailability {
    fn bounds(&self) -> (TimeOfDay, TimeOfDay) {
        (self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub availability: Vec<DayAvailability>,
    /// Length of one appointment in minutes.
    pub appointment_duration: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub doctor_id: Uuid,
    pub availability: Vec<DayAvailability>,
    pub appointment_duration: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub availability: Option<Vec<DayAvailability>>,
    pub appointment_duration: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteScheduleResponse {
    pub id: Uuid,
    pub deleted: bool,
}
