//! Slot REST Routes
//!
//! The three slot endpoints:
//! - `GET /slot_logs/{slot}`: the slot's full document
//! - any verb on `/s/{slot}`: record the request, serve current content
//! - `POST /slot_content/{slot}`: replace content, secret-guarded
//!
//! Every verb on `/s/{slot}` is handled identically; the method is just
//! another captured field of the observation.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Path, Query, Request, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use hookslot_core::{SlotContent, SlotDocument};

use crate::error::{ApiError, ApiResult};
use crate::observation::capture;
use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Body of a content update request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetContentRequest {
    /// Media type to serve the new content under.
    #[serde(rename = "type")]
    pub content_type: String,
    /// The new content payload.
    pub content: String,
    /// Shared secret; must match the configured one.
    #[serde(skip_serializing)]
    pub skey: String,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /slot_logs/{slot} - the slot's current document.
pub async fn read_logs(
    State(state): State<AppState>,
    Path(slot_id): Path<String>,
) -> ApiResult<Json<SlotDocument>> {
    let doc = state.registry.read_logs(&slot_id).await?;
    Ok(Json(doc))
}

/// Any verb on /s/{slot} - record the request, serve the content.
pub async fn record_and_serve(
    State(state): State<AppState>,
    Path(slot_id): Path<String>,
    peer: Option<ConnectInfo<SocketAddr>>,
    Query(query_params): Query<BTreeMap<String, String>>,
    request: Request,
) -> ApiResult<Response> {
    let observation = capture(peer.map(|ConnectInfo(addr)| addr), query_params, request).await?;
    let content = state.registry.record_and_serve(&slot_id, observation).await?;
    Ok(serve_content(content))
}

/// POST /slot_content/{slot} - replace the slot's servable content.
pub async fn set_content(
    State(state): State<AppState>,
    Path(slot_id): Path<String>,
    Json(body): Json<SetContentRequest>,
) -> ApiResult<Json<SlotContent>> {
    verify_secret(&state.secret, &body.skey)?;
    let content = state
        .registry
        .set_content(&slot_id, body.content_type, body.content)
        .await?;
    Ok(Json(content))
}

/// Render slot content as an HTTP response under its stored media type.
///
/// A stored type that is not a valid header value falls back to
/// `text/plain` rather than failing the response.
fn serve_content(content: SlotContent) -> Response {
    let media_type = HeaderValue::from_str(&content.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("text/plain"));
    ([(header::CONTENT_TYPE, media_type)], content.data).into_response()
}

/// Shared-secret equality check guarding content updates.
fn verify_secret(expected: &str, provided: &str) -> ApiResult<()> {
    if expected != provided {
        return Err(ApiError::forbidden("Invalid content update secret"));
    }
    Ok(())
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the slot routes router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/slot_logs/:slot", get(read_logs))
        .route(
            "/s/:slot",
            get(record_and_serve)
                .post(record_and_serve)
                .put(record_and_serve)
                .patch(record_and_serve)
                .delete(record_and_serve),
        )
        .route("/slot_content/:slot", post(set_content))
}
