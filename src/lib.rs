pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Gateway service module
pub mod utils;

use chrono::Utc;
use modules::{db::SHARE_DB_FILE, logger, ShareStore};
use proxy::{AppState, AxumServer};
use std::sync::Arc;
use tracing::{info, warn};

/// Load configuration, start the gateway and serve until Ctrl-C
pub async fn run() -> anyhow::Result<()> {
    let data_dir = modules::get_data_dir()?;
    logger::init_logger(&data_dir);

    let config = modules::load_app_config()?;
    info!(
        "Forwarding /api/* to {} (timeout {}s)",
        config.proxy.backend_base(),
        config.proxy.request_timeout
    );

    let share_store = Arc::new(ShareStore::open(&data_dir.join(SHARE_DB_FILE))?);
    match share_store.purge_expired(Utc::now()) {
        Ok(0) => {}
        Ok(n) => info!("Purged {} expired share snapshots", n),
        Err(e) => warn!("Failed to purge expired share snapshots: {}", e),
    }

    let state = AppState::from_config(&config, share_store)?;
    let (server, handle) =
        AxumServer::start(config.proxy.get_bind_address(), config.proxy.port, state).await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");

    server.stop();
    handle.await.ok();
    Ok(())
}
