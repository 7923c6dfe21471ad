//! REST API Routes Module
//!
//! Route handlers for the slot endpoints and the UI page, composed into
//! the application router with tracing and the permissive development
//! CORS policy.

pub mod slots;
pub mod ui;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(slots::create_router())
        .merge(ui::create_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Permissive CORS for browser-based callers; slots receive webhooks
/// from anywhere by design.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
