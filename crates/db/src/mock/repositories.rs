use async_trait::async_trait;
use carebook_core::conflict::{ConflictPolicy, TimeRange};
use carebook_core::errors::CareResult;
use carebook_core::interval::Pause;
use carebook_core::models::appointment::{Appointment, NewAppointment};
use carebook_core::models::schedule::{CreateScheduleRequest, Schedule, UpdateScheduleRequest};
use carebook_core::notify::Notifier;
use carebook_core::store::{AppointmentStore, ScheduleStore, SlotClaim};
use chrono::{DateTime, Utc};
use mockall::mock;
use uuid::Uuid;

// Mock repositories for testing
mock! {
    pub ScheduleRepo {}

    #[async_trait]
    impl ScheduleStore for ScheduleRepo {
        async fn create_schedule(&self, request: CreateScheduleRequest) -> CareResult<Schedule>;
        async fn get_schedule(&self, id: Uuid) -> CareResult<Option<Schedule>>;
        async fn get_schedule_by_doctor(&self, doctor_id: Uuid) -> CareResult<Option<Schedule>>;
        async fn update_schedule(&self, id: Uuid, request: UpdateScheduleRequest) -> CareResult<Schedule>;
        async fn delete_schedule(&self, id: Uuid) -> CareResult<bool>;
        async fn add_pause(&self, doctor_id: Uuid, day_label: String, pause: Pause) -> CareResult<()>;
        async fn remove_appointment_pauses(&self, doctor_id: Uuid, appointment_id: Uuid) -> CareResult<usize>;
    }
}

mock! {
    pub AppointmentRepo {}

    #[async_trait]
    impl AppointmentStore for AppointmentRepo {
        async fn claim_slot(&self, appointment: NewAppointment, policy: ConflictPolicy) -> CareResult<SlotClaim>;
        async fn reschedule_slot(&self, appointment: Appointment, policy: ConflictPolicy) -> CareResult<SlotClaim>;
        async fn get_appointment(&self, id: Uuid) -> CareResult<Option<Appointment>>;
        async fn find_appointments(&self, doctor_id: Uuid, range: TimeRange) -> CareResult<Vec<Appointment>>;
        async fn list_doctor_appointments(&self, doctor_id: Uuid) -> CareResult<Vec<Appointment>>;
        async fn update_appointment(&self, appointment: Appointment) -> CareResult<Appointment>;
        async fn delete_appointment(&self, id: Uuid) -> CareResult<bool>;
    }
}

mock! {
    pub DoctorNotifier {}

    #[async_trait]
    impl Notifier for DoctorNotifier {
        async fn notify_doctor_of_new_appointment(
            &self,
            doctor_id: Uuid,
            patient_id: Uuid,
            appointment_id: Uuid,
            date_time: DateTime<Utc>,
        ) -> eyre::Result<()>;
    }
}
