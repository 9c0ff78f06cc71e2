//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON bodies of the form
//! `{ "error": message }`. Booking rejections also carry their structured
//! payload under `"rejection"` so clients can offer the waiting list or the
//! available days.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use carebook_core::errors::CareError;
use carebook_core::services::booking::BookingRejection;
use serde_json::json;
use tracing::error;

/// Application error wrapper that provides HTTP status code mapping
///
/// ```
/// use axum::Json;
/// use carebook_api::middleware::error_handling::AppError;
/// use carebook_core::errors::CareError;
///
/// async fn handler(found: bool) -> Result<Json<&'static str>, AppError> {
///     if !found {
///         return Err(AppError(CareError::NotFound("Appointment".to_string())));
///     }
///     Ok(Json("ok"))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub CareError);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            CareError::NotFound(_) | CareError::DayNotFound(_) => StatusCode::NOT_FOUND,
            CareError::Validation(_) | CareError::MalformedTime(_) => StatusCode::BAD_REQUEST,
            CareError::Conflict(_) => StatusCode::CONFLICT,
            CareError::Rejected(BookingRejection::SlotConflict { .. }) => StatusCode::CONFLICT,
            CareError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CareError::Database(_) | CareError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = match &self.0 {
            CareError::Rejected(rejection) => json!({ "error": message, "rejection": rejection }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on `CareResult` in handlers.
impl From<CareError> for AppError {
    fn from(err: CareError) -> Self {
        AppError(err)
    }
}

/// Wraps an eyre report as a database error.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(CareError::Database(err))
    }
}

/// Maps a CareError directly to an HTTP response
pub fn map_error(err: CareError) -> Response {
    AppError(err).into_response()
}
