use std::sync::Arc;

use carebook_api::{config::ApiConfig, notify::notifier_from_config};
use carebook_core::services::BookingService;
use carebook_db::{PgStore, create_pool, schema::initialize_database};
use color_eyre::eyre::Result;
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    // Wire the booking service to PostgreSQL and the configured notifier
    let store = Arc::new(PgStore::new(db_pool));
    let notifier = notifier_from_config(&config)?;
    let booking = BookingService::new(store.clone(), store, notifier, config.booking_settings());

    carebook_api::start_server(config, booking).await?;

    Ok(())
}
