//! # Conflict Detector
//!
//! Decides whether a requested booking collides with a doctor's existing
//! appointments. Two policies are supported:
//!
//! - **Proximity**: any active appointment starting within `duration` minutes
//!   either side of the requested instant collides. Coarse and conservative:
//!   a 09:15 request collides with a 09:00 booking of 30 minutes, and so does
//!   a 09:30 request.
//! - **Overlap**: an active appointment collides only when its own
//!   `[start, start + duration)` intersects the requested interval.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{CareError, CareResult};
use crate::models::appointment::Appointment;
use crate::store::AppointmentStore;

/// How far back the overlap policy looks for long-running appointments.
pub const OVERLAP_LOOKBACK_HOURS: i64 = 24;

/// A half-open `[start, end)` range of absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A slot a booking wants to occupy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub doctor_id: Uuid,
    pub start: DateTime<Utc>,
    pub duration_minutes: i32,
    /// Appointment to ignore, used when moving an existing booking.
    pub exclude: Option<Uuid>,
}

impl SlotRequest {
    /// The slot `appointment` occupies, ignoring the appointment itself.
    pub fn held_by(appointment: &Appointment) -> Self {
        Self {
            doctor_id: appointment.doctor_id,
            start: appointment.date_time,
            duration_minutes: appointment.duration_minutes,
            exclude: Some(appointment.id),
        }
    }

    pub fn interval(&self) -> TimeRange {
        TimeRange::new(
            self.start,
            self.start + Duration::minutes(i64::from(self.duration_minutes)),
        )
    }
}

/// Context for a rejected slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub range: TimeRange,
    pub conflicting: Vec<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    #[default]
    Proximity,
    Overlap,
}

impl ConflictPolicy {
    /// The range of start instants the store must return for [`Self::detect`]
    /// to see every candidate.
    pub fn probe_range(&self, request: &SlotRequest) -> TimeRange {
        let duration = Duration::minutes(i64::from(request.duration_minutes));
        match self {
            ConflictPolicy::Proximity => {
                TimeRange::new(request.start - duration, request.start + duration)
            }
            ConflictPolicy::Overlap => TimeRange::new(
                request.start - Duration::hours(OVERLAP_LOOKBACK_HOURS).max(duration),
                request.start + duration,
            ),
        }
    }

    /// Returns a report when any of `existing` collides with `request`.
    ///
    /// Appointments of other doctors, the excluded appointment and inactive
    /// appointments never collide.
    pub fn detect(&self, request: &SlotRequest, existing: &[Appointment]) -> Option<ConflictReport> {
        let range = self.probe_range(request);
        let wanted = request.interval();

        let conflicting: Vec<Uuid> = existing
            .iter()
            .filter(|a| a.doctor_id == request.doctor_id)
            .filter(|a| Some(a.id) != request.exclude)
            .filter(|a| a.status.is_active())
            .filter(|a| match self {
                ConflictPolicy::Proximity => range.contains(a.date_time),
                ConflictPolicy::Overlap => {
                    TimeRange::new(a.date_time, a.end_time()).overlaps(&wanted)
                }
            })
            .map(|a| a.id)
            .collect();

        if conflicting.is_empty() {
            None
        } else {
            Some(ConflictReport { range, conflicting })
        }
    }
}

impl FromStr for ConflictPolicy {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proximity" => Ok(ConflictPolicy::Proximity),
            "overlap" => Ok(ConflictPolicy::Overlap),
            other => Err(CareError::Validation(format!(
                "Unknown conflict policy {:?}, expected \"proximity\" or \"overlap\"",
                other
            ))),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::Proximity => f.write_str("proximity"),
            ConflictPolicy::Overlap => f.write_str("overlap"),
        }
    }
}

/// Read-only conflict check against the store.
///
/// Booking itself goes through [`AppointmentStore::claim_slot`], which runs
/// the same detection atomically with the insert.
pub async fn check_conflicts(
    store: &dyn AppointmentStore,
    policy: ConflictPolicy,
    request: &SlotRequest,
) -> CareResult<Option<ConflictReport>> {
    let range = policy.probe_range(request);
    debug!(
        "Checking conflicts for doctor {} between {} and {} ({})",
        request.doctor_id, range.start, range.end, policy
    );
    let existing = store.find_appointments(request.doctor_id, range).await?;
    Ok(policy.detect(request, &existing))
}
