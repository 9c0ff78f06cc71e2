use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use carebook_core::conflict::TimeRange;
use carebook_core::errors::CareError;
use carebook_core::models::appointment::{
    Appointment, AppointmentStats, BookAppointmentRequest, DeleteAppointmentResponse,
    UpdateAppointmentRequest,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

/// Optional `[from, to)` window for listing appointments. Both or neither.
#[derive(Debug, Default, Deserialize)]
pub struct ListAppointmentsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl ListAppointmentsQuery {
    fn range(&self) -> Result<Option<TimeRange>, CareError> {
        match (self.from, self.to) {
            (None, None) => Ok(None),
            (Some(from), Some(to)) if from < to => Ok(Some(TimeRange::new(from, to))),
            (Some(from), Some(to)) => Err(CareError::Validation(format!(
                "from ({}) must be before to ({})",
                from, to
            ))),
            _ => Err(CareError::Validation(
                "from and to must be given together".to_string(),
            )),
        }
    }
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = state.booking.book(payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.booking.get_appointment(id).await?))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    Ok(Json(state.booking.update_appointment(id, payload).await?))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteAppointmentResponse>, AppError> {
    state.booking.delete_appointment(id).await?;
    Ok(Json(DeleteAppointmentResponse { id, deleted: true }))
}

#[axum::debug_handler]
pub async fn list_doctor_appointments(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<ListAppointmentsQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let range = query.range()?;
    Ok(Json(state.booking.list_doctor_appointments(doctor_id, range).await?))
}

#[axum::debug_handler]
pub async fn appointment_stats(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<AppointmentStats>, AppError> {
    Ok(Json(state.booking.appointment_stats(doctor_id).await?))
}
