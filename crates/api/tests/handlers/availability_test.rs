use axum::http::StatusCode;
use carebook_api::handlers::availability::ConflictsResponse;
use carebook_core::services::booking::{AvailabilityReport, BookingRejection};
use pretty_assertions::assert_eq;
use serde_json::Value;
use uuid::Uuid;

use crate::common::{booking_body, create_monday_schedule, monday, test_app};

#[tokio::test]
async fn test_check_availability() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;

    let response = app
        .server
        .get(&format!("/api/doctors/{}/availability", doctor_id))
        .add_query_param("at", monday(9, 30).to_rfc3339())
        .await;

    response.assert_status_ok();
    let report = response.json::<AvailabilityReport>();
    assert!(report.is_available);
    assert_eq!(report.requested_date_label, "Monday July 21");
    assert_eq!(report.available_slot.unwrap().appointment_duration, 30);
    assert_eq!(report.reason, None);
}

#[tokio::test]
async fn test_check_availability_after_booking() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;
    app.server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, monday(9, 0)))
        .await
        .assert_status(StatusCode::CREATED);

    let report = app
        .server
        .get(&format!("/api/doctors/{}/availability", doctor_id))
        .add_query_param("at", monday(9, 0).to_rfc3339())
        .await
        .json::<AvailabilityReport>();

    assert!(!report.is_available);
    assert!(!report.can_join_waiting_list);
    assert!(matches!(report.reason, Some(BookingRejection::OnBreak { .. })));
}

#[tokio::test]
async fn test_check_availability_without_schedule() {
    let app = test_app();

    let response = app
        .server
        .get(&format!("/api/doctors/{}/availability", Uuid::new_v4()))
        .add_query_param("at", monday(9, 0).to_rfc3339())
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["is_available"], false);
    assert_eq!(body["available_days"], serde_json::json!([]));
    assert_eq!(body["can_join_waiting_list"], false);
    assert_eq!(body["reason"]["reason"], "no_active_schedule");
}

#[tokio::test]
async fn test_check_availability_requires_instant() {
    let app = test_app();

    let response = app
        .server
        .get(&format!("/api/doctors/{}/availability", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_find_conflicts() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;
    app.server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, monday(9, 0)))
        .await
        .assert_status(StatusCode::CREATED);
    let path = format!("/api/doctors/{}/conflicts", doctor_id);

    let nearby = app
        .server
        .get(&path)
        .add_query_param("at", monday(9, 15).to_rfc3339())
        .await
        .json::<ConflictsResponse>();
    assert!(nearby.has_conflict);
    assert_eq!(nearby.report.unwrap().conflicting.len(), 1);

    let later = app
        .server
        .get(&path)
        .add_query_param("at", monday(11, 0).to_rfc3339())
        .await
        .json::<ConflictsResponse>();
    assert!(!later.has_conflict);
    assert!(later.report.is_none());
}

#[tokio::test]
async fn test_health_and_version() {
    let app = test_app();

    let health = app.server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>()["status"], "ok");

    let version = app.server.get("/version").await.json::<Value>();
    assert_eq!(version["service"], "carebook-api");
}
