use axum::http::StatusCode;
use carebook_core::models::appointment::{Appointment, AppointmentStats, AppointmentStatus};
use carebook_core::store::ScheduleStore;
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::{booking_body, create_monday_schedule, monday, test_app};

#[tokio::test]
async fn test_book_appointment() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;

    let response = app
        .server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, monday(9, 0)))
        .await;

    response.assert_status(StatusCode::CREATED);
    let appointment = response.json::<Appointment>();
    assert_eq!(appointment.doctor_id, doctor_id);
    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.note.as_deref(), Some("first visit"));

    let schedule = app.store.get_schedule_by_doctor(doctor_id).await.unwrap().unwrap();
    assert!(
        schedule.availability[0]
            .pauses
            .iter()
            .any(|p| p.appointment_id == Some(appointment.id))
    );
}

#[tokio::test]
async fn test_book_nearby_slot_conflicts() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;
    let first = app
        .server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, monday(9, 0)))
        .await
        .json::<Appointment>();

    let response = app
        .server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, monday(9, 15)))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Booking rejected: This slot or a nearby slot is already booked");
    assert_eq!(body["rejection"]["reason"], "slot_conflict");
    assert_eq!(body["rejection"]["conflicting"], json!([first.id]));
}

#[tokio::test]
async fn test_book_without_schedule() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();

    let response = app
        .server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, monday(9, 0)))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["rejection"]["reason"], "no_active_schedule");
    assert_eq!(body["rejection"]["doctor_id"], json!(doctor_id));
}

#[tokio::test]
async fn test_book_unavailable_date_offers_waiting_list() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;
    let friday = Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap();

    let response = app
        .server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, friday))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let rejection = &response.json::<Value>()["rejection"];
    assert_eq!(rejection["reason"], "date_not_available");
    assert_eq!(rejection["requested_date_label"], "Friday August 1");
    assert_eq!(rejection["available_days"], json!(["Monday"]));
    assert_eq!(rejection["can_join_waiting_list"], true);
}

#[tokio::test]
async fn test_book_during_break() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;

    let response = app
        .server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, monday(10, 35)))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"], "Booking rejected: Doctor is on a break from 10:30 to 10:45");
    assert_eq!(body["rejection"], json!({ "reason": "on_break", "start": "10:30", "end": "10:45" }));
}

#[tokio::test]
async fn test_appointment_lifecycle() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;
    let appointment = app
        .server
        .post("/api/appointments")
        .json(&booking_body(doctor_id, monday(9, 0)))
        .await
        .json::<Appointment>();
    let path = format!("/api/appointments/{}", appointment.id);

    let fetched = app.server.get(&path).await;
    fetched.assert_status_ok();
    assert_eq!(fetched.json::<Appointment>(), appointment);

    let response = app
        .server
        .put(&path)
        .json(&json!({ "status": "confirmed", "date_time": monday(11, 0) }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Appointment>();
    assert_eq!(updated.status, AppointmentStatus::Confirmed);
    assert_eq!(updated.date_time, monday(11, 0));

    let response = app
        .server
        .put(&path)
        .json(&json!({ "date_time": monday(13, 0) }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.json::<Value>()["rejection"]["reason"], "outside_working_hours");

    app.server.delete(&path).await.assert_status_ok();
    app.server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    app.server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_legacy_status_is_normalised() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;
    let mut body = booking_body(doctor_id, monday(9, 0));
    body["status"] = json!("canceled");

    let response = app.server.post("/api/appointments").json(&body).await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["status"], "cancelled");
}

#[tokio::test]
async fn test_list_appointments_and_stats() {
    let app = test_app();
    let doctor_id = Uuid::new_v4();
    create_monday_schedule(&app.server, doctor_id).await;
    for at in [monday(9, 0), monday(11, 0)] {
        app.server
            .post("/api/appointments")
            .json(&booking_body(doctor_id, at))
            .await
            .assert_status(StatusCode::CREATED);
    }
    let base = format!("/api/doctors/{}/appointments", doctor_id);

    let all = app.server.get(&base).await.json::<Vec<Appointment>>();
    assert_eq!(all.len(), 2);
    assert!(all[0].date_time < all[1].date_time);

    let morning = app
        .server
        .get(&base)
        .add_query_param("from", monday(8, 0).to_rfc3339())
        .add_query_param("to", monday(10, 0).to_rfc3339())
        .await;
    morning.assert_status_ok();
    assert_eq!(morning.json::<Vec<Appointment>>().len(), 1);

    let half_open = app
        .server
        .get(&base)
        .add_query_param("from", monday(8, 0).to_rfc3339())
        .await;
    half_open.assert_status(StatusCode::BAD_REQUEST);

    let stats = app.server.get(&format!("{}/stats", base)).await;
    stats.assert_status_ok();
    assert_eq!(
        stats.json::<AppointmentStats>(),
        AppointmentStats {
            total: 2,
            pending: 2,
            ..AppointmentStats::default()
        }
    );
}
