use thiserror::Error;

use crate::services::booking::BookingRejection;

#[derive(Error, Debug)]
pub enum CareError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed time of day: {0}")]
    MalformedTime(String),

    #[error("Day not found in schedule: {0}")]
    DayNotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Booking rejected: {0}")]
    Rejected(BookingRejection),

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal server error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<BookingRejection> for CareError {
    fn from(rejection: BookingRejection) -> Self {
        CareError::Rejected(rejection)
    }
}

pub type CareResult<T> = Result<T, CareError>;
