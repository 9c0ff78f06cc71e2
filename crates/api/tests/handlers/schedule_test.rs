use axum::http::StatusCode;
use std::sync::Arc;

use carebook_core::errors::CareError;
use carebook_core::models::schedule::{DeleteScheduleResponse, Schedule};
use carebook_db::mock::repositories::{MockAppointmentRepo, MockScheduleRepo};
use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::{create_monday_schedule, server_with, test_app};

#[tokio::test]
async fn test_create_schedule() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();

    let schedule = create_monday_schedule(&app.server, doctor_id).await;

    assert_eq!(schedule.doctor_id, doctor_id);
    assert_eq!(schedule.appointment_duration, 30);
    assert_eq!(schedule.availability[0].start_time.to_string(), "09:00");
    assert_eq!(schedule.availability[0].pauses.len(), 1);
}

#[tokio::test]
async fn test_create_second_schedule_for_doctor_conflicts() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;

    let response = app
        .server
        .post("/api/schedules")
        .json(&json!({
            "doctor_id": doctor_id,
            "availability": [{ "day": "Tuesday", "start_time": "09:00", "end_time": "12:00" }],
            "appointment_duration": 30
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert!(body["error"].as_str().unwrap().contains("already has a schedule"));
}

#[rstest]
#[case(json!([{ "day": "Monday", "start_time": "12:00", "end_time": "09:00" }]), 30)]
#[case(json!([]), 30)]
#[case(json!([{ "day": "Monday", "start_time": "09:00", "end_time": "12:00" }]), 0)]
#[case(json!([{ "day": "", "start_time": "09:00", "end_time": "12:00" }]), 30)]
#[tokio::test]
async fn test_create_invalid_schedule(#[case] availability: Value, #[case] duration: i32) {
    let app = test_app();

    let response = app
        .server
        .post("/api/schedules")
        .json(&json!({
            "doctor_id": Uuid::new_v4(),
            "availability": availability,
            "appointment_duration": duration
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_schedule_with_malformed_time() {
    let app = test_app();

    let response = app
        .server
        .post("/api/schedules")
        .json(&json!({
            "doctor_id": Uuid::new_v4(),
            "availability": [{ "day": "Monday", "start_time": "9am", "end_time": "12:00" }],
            "appointment_duration": 30
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_schedule_by_id_and_doctor() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    let created = create_monday_schedule(&app.server, doctor_id).await;

    let by_id = app.server.get(&format!("/api/schedules/{}", created.id)).await;
    by_id.assert_status_ok();
    assert_eq!(by_id.json::<Schedule>(), created);

    let by_doctor = app.server.get(&format!("/api/doctors/{}/schedule", doctor_id)).await;
    by_doctor.assert_status_ok();
    assert_eq!(by_doctor.json::<Schedule>().id, created.id);
}

#[tokio::test]
async fn test_get_unknown_schedule() {
    let app = test_app();

    let response = app.server.get(&format!("/api/schedules/{}", Uuid::new_v4())).await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = app
        .server
        .get(&format!("/api/doctors/{}/schedule", Uuid::new_v4()))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_schedule() {
    let app = test_app();
    let created = create_monday_schedule(&app.server, Uuid::new_v4()).await;

    let response = app
        .server
        .put(&format!("/api/schedules/{}", created.id))
        .json(&json!({ "appointment_duration": 20 }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Schedule>();
    assert_eq!(updated.appointment_duration, 20);
    assert_eq!(updated.availability, created.availability);

    let response = app.server.delete(&format!("/api/schedules/{}", created.id)).await;
    response.assert_status_ok();
    let deleted = response.json::<DeleteScheduleResponse>();
    assert_eq!(deleted.id, created.id);
    assert!(deleted.deleted);

    let response = app.server.delete(&format!("/api/schedules/{}", created.id)).await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_maps_to_server_error() {
    let id = Uuid::new_v4();
    let mut schedules = MockScheduleRepo::new();
    schedules
        .expect_get_schedule()
        .with(eq(id))
        .times(1)
        .returning(|_| Err(CareError::Database(eyre::eyre!("connection reset"))));
    let server = server_with(Arc::new(schedules), Arc::new(MockAppointmentRepo::new()));

    let response = server.get(&format!("/api/schedules/{}", id)).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Database error: connection reset");
}
