use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/appointments", post(handlers::appointment::book_appointment))
        .route(
            "/api/appointments/:id",
            get(handlers::appointment::get_appointment)
                .put(handlers::appointment::update_appointment)
                .delete(handlers::appointment::delete_appointment),
        )
        .route(
            "/api/doctors/:doctor_id/appointments",
            get(handlers::appointment::list_doctor_appointments),
        )
        .route(
            "/api/doctors/:doctor_id/appointments/stats",
            get(handlers::appointment::appointment_stats),
        )
}
