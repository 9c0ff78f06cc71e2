//! # Booking Services
//!
//! [`BookingService`] is the entry point the HTTP layer talks to. It owns the
//! store and notifier handles and the clinic-wide settings; the operations
//! themselves are split by concern:
//!
//! - [`booking`]: availability checks and the booking orchestrator
//! - [`appointments`]: reading, updating and deleting booked appointments
//! - [`schedules`]: creating and maintaining doctor schedules

pub mod appointments;
pub mod booking;
pub mod schedules;

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::conflict::ConflictPolicy;
use crate::notify::Notifier;
use crate::store::{AppointmentStore, ScheduleStore};

/// Clinic-wide settings applied to every booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingSettings {
    /// Timezone used to turn requested instants into wall-clock time.
    pub timezone: Tz,
    pub conflict_policy: ConflictPolicy,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::UTC,
            conflict_policy: ConflictPolicy::Proximity,
        }
    }
}

#[derive(Clone)]
pub struct BookingService {
    schedules: Arc<dyn ScheduleStore>,
    appointments: Arc<dyn AppointmentStore>,
    notifier: Arc<dyn Notifier>,
    settings: BookingSettings,
}

impl BookingService {
    pub fn new(
        schedules: Arc<dyn ScheduleStore>,
        appointments: Arc<dyn AppointmentStore>,
        notifier: Arc<dyn Notifier>,
        settings: BookingSettings,
    ) -> Self {
        Self {
            schedules,
            appointments,
            notifier,
            settings,
        }
    }

    pub fn settings(&self) -> &BookingSettings {
        &self.settings
    }

    /// Wall-clock time of `instant` in the clinic timezone.
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.settings.timezone).naive_local()
    }
}
