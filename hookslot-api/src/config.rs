//! API Configuration Module
//!
//! Configuration for the HTTP surface: bind address, content update
//! secret, and the UI page path. Loaded from environment variables with
//! development defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{ApiError, ApiResult};

/// Development placeholder secret; a deployment must override it.
pub const PLACEHOLDER_SECRET: &str = "insecure_placeholder_string";

/// Configuration for the HTTP surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Address to bind the listener to.
    pub bind_host: String,

    /// Port to listen on.
    pub port: u16,

    /// Shared secret authorizing content updates.
    pub app_secret: String,

    /// Path of the static UI page served at /webhook_ui.
    pub ui_path: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            port: 3000,
            app_secret: PLACEHOLDER_SECRET.to_string(),
            ui_path: PathBuf::from("static/index.html"),
        }
    }
}

impl ApiConfig {
    /// Create an ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `HOOKSLOT_BIND`: Bind host (default: 0.0.0.0)
    /// - `PORT` / `HOOKSLOT_PORT`: Listen port (default: 3000)
    /// - `HOOKSLOT_APP_SECRET`: Content update secret (default: placeholder)
    /// - `HOOKSLOT_UI_PATH`: UI page path (default: static/index.html)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_host = std::env::var("HOOKSLOT_BIND")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.bind_host);

        let port = std::env::var("PORT")
            .ok()
            .or_else(|| std::env::var("HOOKSLOT_PORT").ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let app_secret = std::env::var("HOOKSLOT_APP_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.app_secret);

        let ui_path = std::env::var("HOOKSLOT_UI_PATH")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.ui_path);

        Self {
            bind_host,
            port,
            app_secret,
            ui_path,
        }
    }

    /// The socket address to bind.
    pub fn bind_addr(&self) -> ApiResult<SocketAddr> {
        let addr = format!("{}:{}", self.bind_host, self.port);
        addr.parse::<SocketAddr>()
            .map_err(|err| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, err)))
    }

    /// Whether the secret is still the development placeholder.
    pub fn uses_placeholder_secret(&self) -> bool {
        self.app_secret == PLACEHOLDER_SECRET
    }
}
