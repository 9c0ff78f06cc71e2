use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use carebook_core::models::schedule::{
    CreateScheduleRequest, DeleteScheduleResponse, Schedule, UpdateScheduleRequest,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let schedule = state.booking.create_schedule(payload).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Schedule>, AppError> {
    Ok(Json(state.booking.get_schedule(id).await?))
}

#[axum::debug_handler]
pub async fn get_doctor_schedule(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Schedule>, AppError> {
    Ok(Json(state.booking.get_doctor_schedule(doctor_id).await?))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<Json<Schedule>, AppError> {
    Ok(Json(state.booking.update_schedule(id, payload).await?))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteScheduleResponse>, AppError> {
    state.booking.delete_schedule(id).await?;
    Ok(Json(DeleteScheduleResponse { id, deleted: true }))
}
