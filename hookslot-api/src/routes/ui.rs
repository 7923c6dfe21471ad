//! UI Route
//!
//! Serves the static UI page. The page is read from disk per request so
//! a deployment can swap it without restarting; it is one small file.

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /webhook_ui - the static UI page.
pub async fn serve_ui(State(state): State<AppState>) -> ApiResult<Response> {
    let html = tokio::fs::read_to_string(state.ui_path.as_ref())
        .await
        .map_err(|err| {
            tracing::error!(path = %state.ui_path.display(), %err, "failed to read UI page");
            ApiError::internal_error("UI page unavailable")
        })?;
    Ok(Html(html).into_response())
}

/// Create the UI router.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/webhook_ui", get(serve_ui))
}
