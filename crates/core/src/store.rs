//! Persistence seams consumed by the booking services.
//!
//! Implementations live in `carebook-db`. Every method takes owned
//! arguments so the traits can be mocked directly.

use async_trait::async_trait;
use uuid::Uuid;

use crate::conflict::{ConflictPolicy, ConflictReport, TimeRange};
use crate::errors::CareResult;
use crate::interval::Pause;
use crate::models::appointment::{Appointment, NewAppointment};
use crate::models::schedule::{CreateScheduleRequest, Schedule, UpdateScheduleRequest};

/// Result of an atomic conflict-check-and-write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotClaim {
    Claimed(Appointment),
    Taken(ConflictReport),
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn create_schedule(&self, request: CreateScheduleRequest) -> CareResult<Schedule>;

    async fn get_schedule(&self, id: Uuid) -> CareResult<Option<Schedule>>;

    async fn get_schedule_by_doctor(&self, doctor_id: Uuid) -> CareResult<Option<Schedule>>;

    /// Applies `request` to schedule `id` (see [`Schedule::apply_update`]) as
    /// one atomic read-modify-write, so pauses added concurrently survive.
    /// Fails with `NotFound` when the schedule does not exist.
    async fn update_schedule(&self, id: Uuid, request: UpdateScheduleRequest) -> CareResult<Schedule>;

    async fn delete_schedule(&self, id: Uuid) -> CareResult<bool>;

    /// Appends a pause to the doctor's entry labelled `day_label` as one
    /// atomic read-modify-write. Fails with `DayNotFound` when no entry matches.
    async fn add_pause(&self, doctor_id: Uuid, day_label: String, pause: Pause) -> CareResult<()>;

    /// Removes the pauses derived from `appointment_id`, atomically.
    async fn remove_appointment_pauses(&self, doctor_id: Uuid, appointment_id: Uuid) -> CareResult<usize>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Runs conflict detection and inserts the appointment as one atomic step.
    async fn claim_slot(&self, appointment: NewAppointment, policy: ConflictPolicy) -> CareResult<SlotClaim>;

    /// Writes time, duration, status and note of `appointment`, running
    /// conflict detection for its slot (excluding itself) in the same atomic
    /// step. Fails with `NotFound` when the appointment does not exist.
    async fn reschedule_slot(&self, appointment: Appointment, policy: ConflictPolicy) -> CareResult<SlotClaim>;

    async fn get_appointment(&self, id: Uuid) -> CareResult<Option<Appointment>>;

    /// Appointments of `doctor_id` starting within `range`, ordered by start.
    async fn find_appointments(&self, doctor_id: Uuid, range: TimeRange) -> CareResult<Vec<Appointment>>;

    async fn list_doctor_appointments(&self, doctor_id: Uuid) -> CareResult<Vec<Appointment>>;

    /// Replaces time, duration, status and note of `appointment.id` without
    /// conflict detection. Used for appointments that hold no slot.
    async fn update_appointment(&self, appointment: Appointment) -> CareResult<Appointment>;

    async fn delete_appointment(&self, id: Uuid) -> CareResult<bool>;
}
