//! # Carebook Core
//!
//! Domain logic of the appointment booking engine: the interval model, doctor
//! schedules, availability resolution, conflict detection and the booking
//! orchestrator. Storage and notification are reached through the traits in
//! [`store`] and [`notify`]; this crate performs no I/O of its own.

pub mod availability;
pub mod conflict;
pub mod errors;
pub mod interval;
pub mod models;
pub mod notify;
pub mod services;
pub mod store;
pub mod weekly;
