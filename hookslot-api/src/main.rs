//! Hookslot Server Entry Point
//!
//! Bootstraps configuration, builds the slot registry over the RESP
//! remote and the local file cache, and starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hookslot_api::{create_app, ApiConfig, ApiError, ApiResult, AppState};
use hookslot_core::{StoreConfig, DEFAULT_SLOT_IDS};
use hookslot_storage::{LocalCache, RemoteBackend, RespRemote, SlotRegistry};

#[tokio::main]
async fn main() -> ApiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store_config = StoreConfig::from_env();
    store_config
        .validate()
        .map_err(|err| ApiError::invalid_input(format!("Invalid store configuration: {}", err)))?;

    let api_config = ApiConfig::from_env();
    if api_config.uses_placeholder_secret() {
        tracing::warn!("HOOKSLOT_APP_SECRET not set, content updates use the placeholder secret");
    }

    let remote: Arc<dyn RemoteBackend> = Arc::new(RespRemote::new(store_config.remote_addr()));
    let cache = LocalCache::new(&store_config.cache_dir);
    let registry = Arc::new(SlotRegistry::new(
        DEFAULT_SLOT_IDS,
        store_config.log_capacity,
        remote,
        &cache,
    ));

    let state = AppState::new(Arc::clone(&registry), &api_config);
    let app = create_app(state);

    let addr = api_config.bind_addr()?;
    tracing::info!(
        %addr,
        slots = registry.len(),
        remote = %store_config.remote_addr(),
        cache_dir = %store_config.cache_dir.display(),
        "Starting Hookslot server"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::internal_error(format!("Failed to bind {}: {}", addr, err)))?;

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );
    tokio::select! {
        result = server => {
            result.map_err(|err| ApiError::internal_error(format!("Server error: {}", err)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
