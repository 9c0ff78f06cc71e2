use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Outbound notification of booking events.
///
/// Delivery is best effort: callers log failures and carry on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_doctor_of_new_appointment(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        appointment_id: Uuid,
        date_time: DateTime<Utc>,
    ) -> eyre::Result<()>;
}
