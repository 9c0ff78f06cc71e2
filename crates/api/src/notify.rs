//! Doctor notifiers handed to the booking service.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use carebook_core::notify::Notifier;
use chrono::{DateTime, Utc};
use eyre::{Result, WrapErr, eyre};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::ApiConfig;

const WEBHOOK_TIMEOUT_SECONDS: u64 = 10;

/// Writes notifications to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_doctor_of_new_appointment(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        appointment_id: Uuid,
        date_time: DateTime<Utc>,
    ) -> Result<()> {
        info!(
            "New appointment {} for doctor {} with patient {} at {}",
            appointment_id, doctor_id, patient_id, date_time
        );
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct NewAppointmentEvent {
    event: &'static str,
    doctor_id: Uuid,
    patient_id: Uuid,
    appointment_id: Uuid,
    date_time: DateTime<Utc>,
}

/// POSTs a JSON event to a fixed URL.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(WEBHOOK_TIMEOUT_SECONDS))
            .build()
            .wrap_err("Failed to build webhook client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify_doctor_of_new_appointment(
        &self,
        doctor_id: Uuid,
        patient_id: Uuid,
        appointment_id: Uuid,
        date_time: DateTime<Utc>,
    ) -> Result<()> {
        let event = NewAppointmentEvent {
            event: "appointment.created",
            doctor_id,
            patient_id,
            appointment_id,
            date_time,
        };

        debug!("Posting appointment {} to {}", appointment_id, self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&event)
            .send()
            .await
            .wrap_err("Webhook request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(eyre!("Webhook returned {}: {}", status, error_text));
        }

        Ok(())
    }
}

/// Picks the webhook notifier when a URL is configured, the log notifier otherwise.
pub fn notifier_from_config(config: &ApiConfig) -> Result<Arc<dyn Notifier>> {
    match &config.notify_webhook_url {
        Some(url) => Ok(Arc::new(WebhookNotifier::new(url.clone())?)),
        None => Ok(Arc::new(LogNotifier)),
    }
}
