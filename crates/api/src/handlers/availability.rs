//! # Availability Handlers
//!
//! Read-only probes of a doctor's calendar. Both take the requested instant
//! as an RFC 3339 `at` query parameter.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use carebook_core::conflict::ConflictReport;
use carebook_core::services::booking::AvailabilityReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{ApiState, middleware::error_handling::AppError};

#[derive(Debug, Deserialize)]
pub struct AtQuery {
    pub at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConflictsResponse {
    pub has_conflict: bool,
    pub report: Option<ConflictReport>,
}

#[axum::debug_handler]
pub async fn check_availability(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AtQuery>,
) -> Result<Json<AvailabilityReport>, AppError> {
    let report = state.booking.check_availability(doctor_id, query.at).await?;
    Ok(Json(report))
}

#[axum::debug_handler]
pub async fn find_conflicts(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    Query(query): Query<AtQuery>,
) -> Result<Json<ConflictsResponse>, AppError> {
    let report = state.booking.find_conflicts(doctor_id, query.at).await?;
    Ok(Json(ConflictsResponse {
        has_conflict: report.is_some(),
        report,
    }))
}
