//! Hookslot API - HTTP Surface
//!
//! The Axum application over the slot registry: request recording and
//! content serving on `/s/{slot}`, log inspection, secret-guarded content
//! updates, and the static UI page.

pub mod config;
pub mod error;
pub mod observation;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, PLACEHOLDER_SECRET};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_app;
pub use state::AppState;
