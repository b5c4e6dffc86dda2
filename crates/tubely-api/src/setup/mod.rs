//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.base.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;
    crate::error::set_production_mode(config.is_production());

    tracing::info!(
        environment = %config.base.environment,
        "Configuration loaded and validated successfully"
    );

    let videos = database::setup_video_repository(&config).await?;

    let storage = tubely_storage::create_storage(&config)
        .await
        .context("Failed to initialize storage")?;

    let state = services::initialize_services(&config, videos, storage)?;

    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
