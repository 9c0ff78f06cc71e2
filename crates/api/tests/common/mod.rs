use std::sync::Arc;

use axum_test::TestServer;
use carebook_api::notify::LogNotifier;
use carebook_api::{ApiState, app};
use carebook_core::models::schedule::Schedule;
use carebook_core::services::{BookingService, BookingSettings};
use carebook_core::store::{AppointmentStore, ScheduleStore};
use carebook_db::MemoryStore;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;

pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let server = server_with(store.clone(), store.clone());

    TestApp { server, store }
}

/// A server over arbitrary stores, e.g. mocks.
pub fn server_with(schedules: Arc<dyn ScheduleStore>, appointments: Arc<dyn AppointmentStore>) -> TestServer {
    let booking = BookingService::new(
        schedules,
        appointments,
        Arc::new(LogNotifier),
        BookingSettings::default(),
    );
    TestServer::new(app(Arc::new(ApiState { booking }))).expect("Failed to start test server")
}

/// Monday 2025-07-21 at the given UTC time.
pub fn monday(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 21, hour, minute, 0).unwrap()
}

/// Monday 09:00-12:00 with a 10:30-10:45 break, 30 minute appointments.
pub async fn create_monday_schedule(server: &TestServer, doctor_id: Uuid) -> Schedule {
    let response = server
        .post("/api/schedules")
        .json(&json!({
            "doctor_id": doctor_id,
            "availability": [{
                "day": "Monday",
                "start_time": "09:00",
                "end_time": "12:00",
                "pauses": [{ "start": "10:30", "end": "10:45" }]
            }],
            "appointment_duration": 30
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Schedule>()
}

pub fn booking_body(doctor_id: Uuid, at: DateTime<Utc>) -> serde_json::Value {
    json!({
        "doctor_id": doctor_id,
        "patient_id": Uuid::new_v4(),
        "date_time": at,
        "note": "first visit"
    })
}
