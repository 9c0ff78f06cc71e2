//! # API Configuration Module
//!
//! Loads configuration for the Carebook API server from environment
//! variables, with defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `CLINIC_TIMEZONE`: IANA timezone of the clinic (default: "UTC")
//! - `CONFLICT_POLICY`: `proximity` or `overlap` (default: "proximity")
//! - `NOTIFY_WEBHOOK_URL`: Endpoint receiving new-appointment notifications

use std::env;

use carebook_core::conflict::ConflictPolicy;
use carebook_core::services::BookingSettings;
use chrono_tz::Tz;
use eyre::{Result, WrapErr, eyre};
use tracing::Level;

/// Configuration for the Carebook API server
///
/// # Example
///
/// ```no_run
/// use eyre::Result;
/// use carebook_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: String,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    /// Timezone requested instants are interpreted in
    pub clinic_timezone: Tz,

    pub conflict_policy: ConflictPolicy,

    /// Webhook for new-appointment notifications; logged only when absent
    pub notify_webhook_url: Option<String>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The DATABASE_URL environment variable is not set
    /// - The API_PORT value cannot be parsed as a u16
    /// - CLINIC_TIMEZONE is not a known IANA timezone
    /// - CONFLICT_POLICY is neither `proximity` nor `overlap`
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Network settings
        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url =
            var("DATABASE_URL").ok_or_else(|| eyre!("DATABASE_URL environment variable must be set"))?;

        // Logging settings
        let log_level = match var("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = var("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        // Booking settings
        let clinic_timezone = match var("CLINIC_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|e| eyre!("Invalid CLINIC_TIMEZONE value {:?}: {}", name, e))?,
            None => chrono_tz::UTC,
        };
        let conflict_policy = match var("CONFLICT_POLICY") {
            Some(policy) => policy.parse().wrap_err("Invalid CONFLICT_POLICY value")?,
            None => ConflictPolicy::default(),
        };

        let notify_webhook_url = var("NOTIFY_WEBHOOK_URL").filter(|url| !url.trim().is_empty());

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            clinic_timezone,
            conflict_policy,
            notify_webhook_url,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn booking_settings(&self) -> BookingSettings {
        BookingSettings {
            timezone: self.clinic_timezone,
            conflict_policy: self.conflict_policy,
        }
    }
}
