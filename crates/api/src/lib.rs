//! # Carebook API
//!
//! The API crate provides the web server for the Carebook clinic booking
//! service. It exposes doctor schedules, availability checks and appointment
//! booking over JSON.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate HTTP requests into [`BookingService`] calls
//! - **Middleware**: Error mapping to HTTP responses
//! - **Notify**: Outbound notifiers handed to the booking service
//! - **Config**: Environment configuration
//!
//! The API uses Axum as the web framework. Storage sits behind the traits in
//! `carebook-core`, so the same router runs on PostgreSQL or in memory.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping to HTTP responses
pub mod middleware;
/// Doctor notifiers
pub mod notify;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use carebook_core::services::BookingService;
use eyre::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub booking: BookingService,
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Schedule management endpoints
        .merge(routes::schedule::routes())
        // Appointment booking and management endpoints
        .merge(routes::appointment::routes())
        // Availability and conflict probes
        .merge(routes::availability::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and booking service
///
/// Installs the tracing subscriber, applies CORS and the request timeout,
/// and serves until the listener fails.
pub async fn start_server(config: config::ApiConfig, booking: BookingService) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(
        "Booking in timezone {} with {} conflict policy",
        booking.settings().timezone,
        booking.settings().conflict_policy
    );

    let app = app(Arc::new(ApiState { booking }));

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let allowed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin {:?}", origin);
                    None
                }
            })
            .collect();

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
            ])
            .allow_origin(allowed)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request tracing and timeout middleware
    let app = app.layer(
        tower::ServiceBuilder::new()
            .layer(tower_http::trace::TraceLayer::new_for_http())
            .layer(tower_http::timeout::TimeoutLayer::new(
                std::time::Duration::from_secs(config.request_timeout),
            )),
    );

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
