use tracing::{debug, info};
use uuid::Uuid;

use super::BookingService;
use crate::errors::{CareError, CareResult};
use crate::models::schedule::{CreateScheduleRequest, Schedule, UpdateScheduleRequest};
use crate::weekly::validate_availability;

impl BookingService {
    /// Creates the schedule of a doctor. Each doctor has at most one.
    pub async fn create_schedule(&self, request: CreateScheduleRequest) -> CareResult<Schedule> {
        validate_availability(&request.availability, request.appointment_duration)?;

        if self
            .schedules
            .get_schedule_by_doctor(request.doctor_id)
            .await?
            .is_some()
        {
            return Err(CareError::Conflict(format!(
                "Doctor {} already has a schedule",
                request.doctor_id
            )));
        }

        let schedule = self.schedules.create_schedule(request).await?;
        info!(
            "Created schedule {} for doctor {} with {} day(s)",
            schedule.id,
            schedule.doctor_id,
            schedule.availability.len()
        );
        Ok(schedule)
    }

    pub async fn get_schedule(&self, id: Uuid) -> CareResult<Schedule> {
        self.schedules
            .get_schedule(id)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("Schedule with ID {} not found", id)))
    }

    pub async fn get_doctor_schedule(&self, doctor_id: Uuid) -> CareResult<Schedule> {
        self.schedules
            .get_schedule_by_doctor(doctor_id)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("No schedule for doctor {}", doctor_id)))
    }

    /// Replaces the supplied fields of a schedule. Pauses held by booked
    /// appointments are kept.
    pub async fn update_schedule(&self, id: Uuid, request: UpdateScheduleRequest) -> CareResult<Schedule> {
        debug!("Updating schedule {}", id);
        let schedule = self.schedules.update_schedule(id, request).await?;
        info!(
            "Updated schedule {} for doctor {} with {} day(s)",
            schedule.id,
            schedule.doctor_id,
            schedule.availability.len()
        );
        Ok(schedule)
    }

    pub async fn delete_schedule(&self, id: Uuid) -> CareResult<()> {
        if !self.schedules.delete_schedule(id).await? {
            return Err(CareError::NotFound(format!("Schedule with ID {} not found", id)));
        }
        info!("Deleted schedule {}", id);
        Ok(())
    }
}
