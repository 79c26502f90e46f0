//! Application setup and initialization.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use courtly_core::Config;

use crate::state::AppState;

/// Initialize the entire application: config validation, telemetry,
/// database pool and migrations, services, and routes.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.is_production());
    tracing::info!(environment = %config.environment, "Configuration loaded and validated");

    let pool = database::setup_database(&config).await?;
    let state = AppState::new(config, pool);
    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
