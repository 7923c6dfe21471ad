//! Shared application state for the Axum router.

use std::path::PathBuf;
use std::sync::Arc;

use hookslot_storage::SlotRegistry;

use crate::config::ApiConfig;

/// Application-wide state shared across all routes.
///
/// The registry is the immutable slot map built once at startup; handlers
/// reach every slot through it and never hold slot references of their own.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SlotRegistry>,
    /// Shared secret authorizing content updates.
    pub secret: Arc<String>,
    /// Path of the static UI page.
    pub ui_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(registry: Arc<SlotRegistry>, config: &ApiConfig) -> Self {
        Self {
            registry,
            secret: Arc::new(config.app_secret.clone()),
            ui_path: Arc::new(config.ui_path.clone()),
        }
    }
}
