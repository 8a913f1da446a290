//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use hireboard_core::Config;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    hireboard_infra::init_telemetry(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let (presigner, cache) = storage::setup_storage(&config).await?;

    let state = services::initialize_services(&config, pool, presigner, cache);

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
